//! Request dispatch: validate, resolve, read, render, compose.

use crate::{
    config::{Config, SecurityHeaders},
    error::SiteError,
    headers, markdown,
    page::Page,
    path::{self, ContentRoot, Target},
};
use askama::Template;
use axum::{
    extract::{rejection::PathRejection, Path, Request, State},
    http::{header::CONTENT_TYPE, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::{convert::Infallible, fs, io, path::PathBuf, sync::Arc, time::Duration};
use tower::ServiceExt;
use tower_http::{services::ServeFile, timeout::TimeoutLayer};

/// What a request path turned into.
#[derive(Debug)]
pub enum Reply {
    /// A composed HTML document.
    Page(String),
    /// The stylesheet, left to [`ServeFile`] for conditional and range requests.
    Stylesheet(PathBuf),
}

/// Everything a request needs, fixed at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Site {
    root: ContentRoot,
    security_headers: SecurityHeaders,
}

impl Site {
    pub fn new(root: ContentRoot, security_headers: SecurityHeaders) -> Self {
        Self {
            root,
            security_headers,
        }
    }

    pub fn from_config(config: &Config) -> io::Result<Self> {
        let root = ContentRoot::new(&config.content_dir)?;
        Ok(Self::new(root, config.security_headers))
    }

    pub fn root(&self) -> &ContentRoot {
        &self.root
    }

    /// Answers one request path (percent-decoded, leading `/` removed).
    ///
    /// Blocks on the filesystem; run it off the async workers.
    pub fn answer(&self, path: &str) -> Result<Reply, SiteError> {
        path::validate(path)?;

        match self.root.resolve(path)? {
            Target::Stylesheet(file) => Ok(Reply::Stylesheet(file)),
            Target::Markdown(file) => {
                let source = self.read(&file)?;
                let html = render_page(&source)?;
                tracing::debug!(file = %file.display(), "serving page");
                Ok(Reply::Page(html))
            }
        }
    }

    // The file can vanish between the existence check and this read. That
    // surfaces as a read failure, not a crash.
    fn read(&self, file: &std::path::Path) -> Result<Vec<u8>, SiteError> {
        fs::read(file).map_err(|source| SiteError::Read {
            path: file
                .strip_prefix(self.root.as_path())
                .unwrap_or(file)
                .display()
                .to_string(),
            source,
        })
    }
}

/// Renders markdown source into a complete HTML document.
pub fn render_page(source: &[u8]) -> Result<String, SiteError> {
    let content = markdown::render(source);
    let text = String::from_utf8_lossy(source);
    let title = markdown::extract_title(&text);
    Ok(Page::new(title, &content).render()?)
}

async fn dispatch(site: Arc<Site>, path: String, request: Request) -> Response {
    let reply = tokio::task::spawn_blocking(move || site.answer(&path))
        .await
        .map_err(|err| SiteError::Internal(err.into()))
        .and_then(|answer| answer);

    match reply {
        Ok(Reply::Page(html)) => {
            ([(CONTENT_TYPE, mime::TEXT_HTML_UTF_8.as_ref())], html).into_response()
        }
        Ok(Reply::Stylesheet(file)) => {
            let served: Result<_, Infallible> = ServeFile::new_with_mime(file, &mime::TEXT_CSS)
                .oneshot(request)
                .await;
            match served {
                Ok(response) => response.into_response(),
                Err(never) => match never {},
            }
        }
        Err(err) => err.into_response(),
    }
}

async fn index(State(site): State<Arc<Site>>, request: Request) -> Response {
    dispatch(site, String::new(), request).await
}

async fn page(
    State(site): State<Arc<Site>>,
    path: Result<Path<String>, PathRejection>,
    request: Request,
) -> Response {
    match path {
        Ok(Path(path)) => dispatch(site, path, request).await,
        Err(rejection) => {
            tracing::debug!(%rejection, "undecodable request path");
            SiteError::InvalidPath("not valid UTF-8 once decoded").into_response()
        }
    }
}

/// One catch-all route for every method, wrapped in the security header
/// middleware.
pub fn router(site: Site) -> Router {
    let policy = site.security_headers;
    Router::new()
        .route("/", any(index))
        .route("/{*path}", any(page))
        .layer(middleware::from_fn_with_state(policy, headers::apply))
        .with_state(Arc::new(site))
}

/// Answers 408 for any request still running after `timeout`.
pub fn with_timeout(router: Router, timeout: Duration) -> Router {
    router.layer(TimeoutLayer::with_status_code(
        StatusCode::REQUEST_TIMEOUT,
        timeout,
    ))
}
