//! HTTP implementation of [`CatalogSource`].

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use coursecraft_core::catalog::{CourseDetails, CourseSummary, Subject};
use coursecraft_core::error::CatalogError;
use coursecraft_core::traits::CatalogSource;

/// Catalog backend reached over plain HTTP GETs.
pub struct HttpCatalog {
    base: Url,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base = Url::parse(base_url).with_context(|| format!("invalid catalog URL: {base_url}"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("invalid catalog URL: {base_url}");
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { base, client })
    }

    /// `{base}/subjects/{segments..}`, each segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().push("subjects").extend(segments);
        }
        url
    }

    /// GET `url` and decode the body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> anyhow::Result<T> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;
        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("{url} returned HTTP {}", status.as_u16());
        }
        response
            .json::<T>()
            .await
            .with_context(|| format!("invalid response body from {url}"))
    }
}

#[derive(Deserialize)]
struct SubjectsEnvelope {
    subjects: Vec<WireSubject>,
}

#[derive(Deserialize)]
struct WireSubject {
    id: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, alias = "course_count")]
    total_courses: u32,
}

impl From<WireSubject> for Subject {
    fn from(wire: WireSubject) -> Self {
        let id = id_string(&wire.id);
        Subject {
            name: wire.name.unwrap_or_else(|| id.clone()),
            id,
            course_count: wire.total_courses,
        }
    }
}

#[derive(Deserialize)]
struct CoursesEnvelope {
    courses: Vec<WireCourse>,
}

#[derive(Deserialize)]
struct WireCourse {
    id: Value,
    #[serde(default, alias = "name")]
    title: Option<String>,
}

impl From<WireCourse> for CourseSummary {
    fn from(wire: WireCourse) -> Self {
        let id = id_string(&wire.id);
        CourseSummary {
            name: wire.title.unwrap_or_else(|| id.clone()),
            course_code: id.clone(),
            id,
        }
    }
}

/// Ids arrive as strings or numbers depending on the record.
fn id_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn details_from_value(mut value: Value, course_id: &str) -> anyhow::Result<CourseDetails> {
    if let Some(id) = value.get_mut("id") {
        if !id.is_string() {
            *id = Value::String(id_string(id));
        }
    }
    let mut details: CourseDetails =
        serde_json::from_value(value).context("invalid course record")?;
    details.adopt_alternate_fields();
    if details.id.is_empty() {
        details.id = course_id.to_string();
    }
    Ok(details)
}

#[async_trait]
impl CatalogSource for HttpCatalog {
    #[instrument(skip(self))]
    async fn fetch_subjects(&self) -> Result<Vec<Subject>, CatalogError> {
        let envelope: SubjectsEnvelope =
            self.get_json(self.endpoint(&[""])).await.map_err(|e| {
                tracing::error!("subject fetch failed: {e:#}");
                CatalogError::Subjects
            })?;
        let subjects: Vec<Subject> = envelope.subjects.into_iter().map(Subject::from).collect();
        tracing::debug!(count = subjects.len(), "subjects fetched");
        Ok(subjects)
    }

    #[instrument(skip(self))]
    async fn fetch_courses(&self, subject_id: &str) -> Result<Vec<CourseSummary>, CatalogError> {
        let envelope: CoursesEnvelope = self
            .get_json(self.endpoint(&[subject_id]))
            .await
            .map_err(|e| {
                tracing::error!("course list fetch failed: {e:#}");
                CatalogError::Courses {
                    subject_id: subject_id.to_string(),
                }
            })?;
        let courses: Vec<CourseSummary> = envelope
            .courses
            .into_iter()
            .map(CourseSummary::from)
            .collect();
        tracing::debug!(count = courses.len(), "courses fetched");
        Ok(courses)
    }

    #[instrument(skip(self))]
    async fn fetch_course_details(
        &self,
        subject_id: &str,
        course_id: &str,
    ) -> Result<CourseDetails, CatalogError> {
        let failed = |e: anyhow::Error| {
            tracing::error!("course details fetch failed: {e:#}");
            CatalogError::CourseDetails {
                course_id: course_id.to_string(),
            }
        };
        let value: Value = self
            .get_json(self.endpoint(&[subject_id, course_id]))
            .await
            .map_err(failed)?;
        details_from_value(value, course_id).map_err(failed)
    }
}
