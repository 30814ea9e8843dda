//! Absolute link construction from a request's scheme/host/port and path segments.

use crate::document::Link;
use crate::error::AppError;
use url::Url;

/// Link names understood by the builder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Keyword {
    SelfLink,
    Related,
    Up,
}

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::SelfLink => "self",
            Keyword::Related => "related",
            Keyword::Up => "up",
        }
    }
}

/// Scheme, host and optional port every link in a document is rooted at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlBuilderConfiguration {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl UrlBuilderConfiguration {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: Option<u16>) -> Self {
        Self {
            scheme: scheme.into(),
            host: host.into(),
            port,
        }
    }

    /// Take scheme, host and explicit port from the current request URL.
    pub fn from_url(url: &Url) -> Result<Self, AppError> {
        let host = url
            .host_str()
            .ok_or_else(|| AppError::InvalidConfiguration(format!("{} has no host", url)))?;
        Ok(Self::new(url.scheme(), host, url.port()))
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> Option<u16> {
        self.port
    }

    fn base_url(&self) -> Result<Url, AppError> {
        if self.scheme.trim().is_empty() {
            return Err(AppError::InvalidConfiguration("scheme is empty".into()));
        }
        if self.host.trim().is_empty() {
            return Err(AppError::InvalidConfiguration("host is empty".into()));
        }
        let raw = format!("{}://{}", self.scheme, self.host);
        let mut url = Url::parse(&raw).map_err(|e| AppError::InvalidConfiguration(format!("{}: {}", raw, e)))?;
        if url.cannot_be_a_base() || url.path() != "/" || url.query().is_some() || url.fragment().is_some() {
            return Err(AppError::InvalidConfiguration(format!("{} is not a bare host", raw)));
        }
        if let Some(port) = self.port {
            url.set_port(Some(port))
                .map_err(|_| AppError::InvalidConfiguration(format!("{} cannot carry a port", raw)))?;
        }
        Ok(url)
    }
}

pub struct LinkBuilder;

impl LinkBuilder {
    /// `scheme://host[:port]/seg1/seg2...`. Segments are percent-encoded, empty ones skipped,
    /// and the scheme's default port is omitted.
    pub fn build<I, S>(config: &UrlBuilderConfiguration, segments: I) -> Result<Link, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut url = config.base_url()?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| AppError::InvalidConfiguration(format!("{} cannot hold a path", config.host)))?;
            path.clear();
            for segment in segments {
                let segment = segment.as_ref();
                if !segment.is_empty() {
                    path.push(segment);
                }
            }
        }
        Ok(Link::new(url.to_string()))
    }
}
