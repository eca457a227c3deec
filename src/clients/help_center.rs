//! Help Center API: categories, sections and articles.
//!
//! Every path lives under `help_center/`.

use std::sync::Arc;

use super::{envelope, require};
use crate::error::ZendeskError;
use crate::models::{
    from_envelope, list_from_envelope, Article, ArticlePayload, Category, CategoryPayload,
    Section, SectionPayload,
};
use crate::pagination::OffsetPaginator;
use crate::transport::{QueryParams, Transport};

const PREFIX: &str = "help_center";

fn hc_path(path: impl AsRef<str>) -> String {
    format!("{}/{}", PREFIX, path.as_ref())
}

/// Entry point for the Help Center; groups the three content clients.
#[derive(Clone)]
pub struct HelpCenterClient {
    pub categories: CategoriesClient,
    pub sections: SectionsClient,
    pub articles: ArticlesClient,
}

impl HelpCenterClient {
    pub(crate) fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            categories: CategoriesClient {
                transport: transport.clone(),
            },
            sections: SectionsClient {
                transport: transport.clone(),
            },
            articles: ArticlesClient { transport },
        }
    }
}

/// Client for Help Center categories.
#[derive(Clone)]
pub struct CategoriesClient {
    transport: Arc<dyn Transport>,
}

impl CategoriesClient {
    pub fn list(&self, per_page: u32) -> OffsetPaginator<Category> {
        OffsetPaginator::offset(
            self.transport.clone(),
            hc_path("categories.json"),
            "categories",
            per_page,
        )
    }

    pub async fn get(&self, category_id: u64) -> Result<Category, ZendeskError> {
        let path = hc_path(format!("categories/{}.json", category_id));
        let response = self.transport.get(&path, &QueryParams::new(), None).await?;
        from_envelope(&response, "category")
    }

    /// Creates a category. `name` is required.
    pub async fn create(&self, payload: &CategoryPayload) -> Result<Category, ZendeskError> {
        require(payload.name.as_deref(), "name")?;
        let body = envelope("category", payload)?;
        let response = self
            .transport
            .post(&hc_path("categories.json"), Some(&body), None)
            .await?;
        from_envelope(&response, "category")
    }

    pub async fn update(
        &self,
        category_id: u64,
        payload: &CategoryPayload,
    ) -> Result<Category, ZendeskError> {
        let path = hc_path(format!("categories/{}.json", category_id));
        let body = envelope("category", payload)?;
        let response = self.transport.put(&path, Some(&body), None).await?;
        from_envelope(&response, "category")
    }

    /// Deletes a category. The server deletes its sections and articles too.
    pub async fn delete(&self, category_id: u64) -> Result<(), ZendeskError> {
        let path = hc_path(format!("categories/{}.json", category_id));
        self.transport.delete(&path, None, None).await?;
        tracing::info!(category_id, "Deleted category");
        Ok(())
    }
}

/// Client for Help Center sections.
#[derive(Clone)]
pub struct SectionsClient {
    transport: Arc<dyn Transport>,
}

impl SectionsClient {
    pub fn list(&self, per_page: u32) -> OffsetPaginator<Section> {
        OffsetPaginator::offset(
            self.transport.clone(),
            hc_path("sections.json"),
            "sections",
            per_page,
        )
    }

    /// Sections of one category.
    pub fn for_category(&self, category_id: u64, per_page: u32) -> OffsetPaginator<Section> {
        OffsetPaginator::offset(
            self.transport.clone(),
            hc_path(format!("categories/{}/sections.json", category_id)),
            "sections",
            per_page,
        )
    }

    pub async fn get(&self, section_id: u64) -> Result<Section, ZendeskError> {
        let path = hc_path(format!("sections/{}.json", section_id));
        let response = self.transport.get(&path, &QueryParams::new(), None).await?;
        from_envelope(&response, "section")
    }

    /// Creates a section inside a category. `name` is required.
    pub async fn create(
        &self,
        category_id: u64,
        payload: &SectionPayload,
    ) -> Result<Section, ZendeskError> {
        require(payload.name.as_deref(), "name")?;
        let path = hc_path(format!("categories/{}/sections.json", category_id));
        let body = envelope("section", payload)?;
        let response = self.transport.post(&path, Some(&body), None).await?;
        from_envelope(&response, "section")
    }

    pub async fn update(
        &self,
        section_id: u64,
        payload: &SectionPayload,
    ) -> Result<Section, ZendeskError> {
        let path = hc_path(format!("sections/{}.json", section_id));
        let body = envelope("section", payload)?;
        let response = self.transport.put(&path, Some(&body), None).await?;
        from_envelope(&response, "section")
    }

    /// Deletes a section and, server-side, its articles.
    pub async fn delete(&self, section_id: u64) -> Result<(), ZendeskError> {
        let path = hc_path(format!("sections/{}.json", section_id));
        self.transport.delete(&path, None, None).await?;
        tracing::info!(section_id, "Deleted section");
        Ok(())
    }
}

/// Filters for [`ArticlesClient::search`].
#[derive(Debug, Clone, Default)]
pub struct ArticleSearch {
    pub category_id: Option<u64>,
    pub section_id: Option<u64>,
    pub label_names: Vec<String>,
    pub locale: Option<String>,
    pub per_page: Option<u32>,
}

impl ArticleSearch {
    fn params(&self, query_text: &str) -> QueryParams {
        let mut params = QueryParams::new();
        params.insert("query".into(), query_text.to_string());
        params.insert("per_page".into(), self.per_page.unwrap_or(25).to_string());
        if let Some(category) = self.category_id {
            params.insert("category".into(), category.to_string());
        }
        if let Some(section) = self.section_id {
            params.insert("section".into(), section.to_string());
        }
        if !self.label_names.is_empty() {
            params.insert("label_names".into(), self.label_names.join(","));
        }
        if let Some(locale) = &self.locale {
            params.insert("locale".into(), locale.clone());
        }
        params
    }
}

/// Client for Help Center articles.
#[derive(Clone)]
pub struct ArticlesClient {
    transport: Arc<dyn Transport>,
}

impl ArticlesClient {
    pub fn list(&self, per_page: u32) -> OffsetPaginator<Article> {
        self.paginate(hc_path("articles.json"), per_page)
    }

    pub fn for_section(&self, section_id: u64, per_page: u32) -> OffsetPaginator<Article> {
        self.paginate(
            hc_path(format!("sections/{}/articles.json", section_id)),
            per_page,
        )
    }

    pub fn for_category(&self, category_id: u64, per_page: u32) -> OffsetPaginator<Article> {
        self.paginate(
            hc_path(format!("categories/{}/articles.json", category_id)),
            per_page,
        )
    }

    pub async fn get(&self, article_id: u64) -> Result<Article, ZendeskError> {
        let path = hc_path(format!("articles/{}.json", article_id));
        let response = self.transport.get(&path, &QueryParams::new(), None).await?;
        from_envelope(&response, "article")
    }

    /// Creates an article in a section. `title` is required.
    pub async fn create(
        &self,
        section_id: u64,
        payload: &ArticlePayload,
    ) -> Result<Article, ZendeskError> {
        require(payload.title.as_deref(), "title")?;
        let path = hc_path(format!("sections/{}/articles.json", section_id));
        let body = envelope("article", payload)?;
        let response = self.transport.post(&path, Some(&body), None).await?;
        from_envelope(&response, "article")
    }

    pub async fn update(
        &self,
        article_id: u64,
        payload: &ArticlePayload,
    ) -> Result<Article, ZendeskError> {
        let path = hc_path(format!("articles/{}.json", article_id));
        let body = envelope("article", payload)?;
        let response = self.transport.put(&path, Some(&body), None).await?;
        from_envelope(&response, "article")
    }

    pub async fn delete(&self, article_id: u64) -> Result<(), ZendeskError> {
        let path = hc_path(format!("articles/{}.json", article_id));
        self.transport.delete(&path, None, None).await?;
        Ok(())
    }

    /// Full-text search over titles and bodies; returns the first page.
    pub async fn search(
        &self,
        query_text: &str,
        filter: &ArticleSearch,
    ) -> Result<Vec<Article>, ZendeskError> {
        if query_text.trim().is_empty() {
            return Err(ZendeskError::validation("search query cannot be empty"));
        }
        let response = self
            .transport
            .get(
                &hc_path("articles/search.json"),
                &filter.params(query_text),
                None,
            )
            .await?;
        list_from_envelope(&response, "results")
    }

    fn paginate(&self, path: String, per_page: u32) -> OffsetPaginator<Article> {
        OffsetPaginator::offset(self.transport.clone(), path, "articles", per_page)
    }
}
