//! In-memory blogging repository. Reads take a snapshot guard; article creation takes the write lock.

use crate::domain::{Article, Blog, Comment, Person};
use crate::error::AppError;
use rand::Rng;
use std::sync::{RwLock, RwLockReadGuard};

const NEW_ARTICLE_IDS: std::ops::Range<i64> = 100..1000;

#[derive(Clone, Debug, Default)]
pub struct BloggingData {
    pub blogs: Vec<Blog>,
    pub articles: Vec<Article>,
    pub comments: Vec<Comment>,
    pub people: Vec<Person>,
}

impl BloggingData {
    pub fn blog(&self, blog_id: i64) -> Option<&Blog> {
        self.blogs.iter().find(|b| b.blog_id == blog_id)
    }

    pub fn article(&self, article_id: i64) -> Option<&Article> {
        self.articles.iter().find(|a| a.article_id == article_id)
    }

    pub fn comment(&self, comment_id: i64) -> Option<&Comment> {
        self.comments.iter().find(|c| c.comment_id == comment_id)
    }

    pub fn person(&self, person_id: i64) -> Option<&Person> {
        self.people.iter().find(|p| p.person_id == person_id)
    }

    pub fn blog_articles(&self, blog: &Blog) -> Vec<Article> {
        self.articles
            .iter()
            .filter(|a| a.blog_id == blog.blog_id)
            .cloned()
            .collect()
    }

    pub fn article_blog(&self, article: &Article) -> Option<Blog> {
        self.blog(article.blog_id).cloned()
    }

    pub fn article_author(&self, article: &Article) -> Option<Person> {
        self.person(article.author_id).cloned()
    }

    pub fn article_comments(&self, article: &Article) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|c| c.article_id == article.article_id)
            .cloned()
            .collect()
    }

    pub fn comment_article(&self, comment: &Comment) -> Option<Article> {
        self.article(comment.article_id).cloned()
    }

    pub fn comment_author(&self, comment: &Comment) -> Option<Person> {
        self.person(comment.author_id).cloned()
    }

    pub fn person_articles(&self, person: &Person) -> Vec<Article> {
        self.articles
            .iter()
            .filter(|a| a.author_id == person.person_id)
            .cloned()
            .collect()
    }

    pub fn person_comments(&self, person: &Person) -> Vec<Comment> {
        self.comments
            .iter()
            .filter(|c| c.author_id == person.person_id)
            .cloned()
            .collect()
    }

    /// Distinct comments across `articles`, in first-seen order.
    pub fn comments_of_articles(&self, articles: &[Article]) -> Vec<Comment> {
        let mut comments: Vec<Comment> = Vec::new();
        for article in articles {
            for comment in self.article_comments(article) {
                if !comments.iter().any(|c| c.comment_id == comment.comment_id) {
                    comments.push(comment);
                }
            }
        }
        comments
    }
}

fn not_found(type_name: &str, id: i64) -> AppError {
    tracing::warn!(resource = type_name, id, "not found");
    AppError::NotFound(format!("{}/{}", type_name, id))
}

pub struct BloggingRepository {
    data: RwLock<BloggingData>,
}

impl BloggingRepository {
    pub fn new(data: BloggingData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Sample blogs, articles, comments and people.
    pub fn seeded() -> Self {
        Self::new(seed_data())
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, BloggingData>, AppError> {
        self.data
            .read()
            .map_err(|_| AppError::Internal("repository lock poisoned".into()))
    }

    pub fn get_blog(&self, blog_id: i64) -> Result<Blog, AppError> {
        self.read()?.blog(blog_id).cloned().ok_or_else(|| not_found("blogs", blog_id))
    }

    pub fn get_article(&self, article_id: i64) -> Result<Article, AppError> {
        self.read()?
            .article(article_id)
            .cloned()
            .ok_or_else(|| not_found("articles", article_id))
    }

    pub fn get_comment(&self, comment_id: i64) -> Result<Comment, AppError> {
        self.read()?
            .comment(comment_id)
            .cloned()
            .ok_or_else(|| not_found("comments", comment_id))
    }

    pub fn get_person(&self, person_id: i64) -> Result<Person, AppError> {
        self.read()?
            .person(person_id)
            .cloned()
            .ok_or_else(|| not_found("people", person_id))
    }

    /// Store a new article under a random unused id in `100..1000`.
    pub fn add_article(&self, mut article: Article) -> Result<Article, AppError> {
        let mut data = self
            .data
            .write()
            .map_err(|_| AppError::Internal("repository lock poisoned".into()))?;
        let free = NEW_ARTICLE_IDS.filter(|id| data.article(*id).is_none()).count();
        if free == 0 {
            return Err(AppError::Internal("no free article ids".into()));
        }
        let mut rng = rand::thread_rng();
        article.article_id = loop {
            let candidate = rng.gen_range(NEW_ARTICLE_IDS);
            if data.article(candidate).is_none() {
                break candidate;
            }
        };
        data.articles.push(article.clone());
        tracing::info!(article_id = article.article_id, title = %article.title, "article created");
        Ok(article)
    }
}

fn seed_data() -> BloggingData {
    let person = |person_id: i64, first_name: &str, last_name: &str, twitter: Option<&str>| Person {
        person_id,
        first_name: first_name.into(),
        last_name: last_name.into(),
        twitter: twitter.map(Into::into),
    };
    let article = |article_id: i64, blog_id: i64, author_id: i64, title: &str, text: &str| Article {
        article_id,
        blog_id,
        author_id,
        title: title.into(),
        text: text.into(),
    };
    let comment = |comment_id: i64, article_id: i64, author_id: i64, body: &str| Comment {
        comment_id,
        article_id,
        author_id,
        body: body.into(),
    };
    BloggingData {
        blogs: vec![
            Blog {
                blog_id: 1,
                name: "JSON:API in Practice".into(),
            },
            Blog {
                blog_id: 2,
                name: "Systems Notes".into(),
            },
        ],
        articles: vec![
            article(1, 1, 9, "Compound documents", "Primary data, relationships and the included section."),
            article(2, 1, 9, "Resource linkage", "Why every relationship should carry type and id."),
            article(3, 2, 1, "Bounded queues", "Backpressure beats unbounded buffering."),
        ],
        comments: vec![
            comment(1, 1, 2, "Finally a clear explanation of included."),
            comment(2, 1, 1, "What about sparse fieldsets?"),
            comment(3, 2, 2, "Null linkage tripped me up too."),
            comment(4, 3, 9, "Measured it: the bounded queue won."),
        ],
        people: vec![
            person(1, "Grace", "Hopper", Some("grace")),
            person(2, "Alan", "Turing", None),
            person(9, "Ada", "Lovelace", Some("ada")),
        ],
    }
}
