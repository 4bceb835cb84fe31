// Photo store collaborators: the trait the board talks to, an HTTP
// implementation over `fetch`, and an in-memory one for tests.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestCredentials, RequestInit, Response};

use crate::error::StoreError;
use crate::model::{Canvas, LogicalPosition, MoveRequest, Photo, PhotoId};
use crate::util::cwarn;

pub type StoreFuture<T> = Pin<Box<dyn Future<Output = Result<T, StoreError>>>>;

pub trait PhotoStore {
    fn canvas_by_slug(&self, slug: &str) -> StoreFuture<Canvas>;
    /// One snapshot of every photo on the canvas.
    fn list_photos(&self, canvas_id: &str) -> StoreFuture<Vec<Photo>>;
    /// Overwrites a photo's position; last write wins.
    fn move_photo(&self, photo_id: &PhotoId, position: LogicalPosition) -> StoreFuture<()>;
    fn viewer_is_owner(&self, canvas_id: &str) -> StoreFuture<bool>;
}

/// Store handle for component props; equal when it is the same store.
#[derive(Clone)]
pub struct SharedStore(pub Rc<dyn PhotoStore>);

impl SharedStore {
    pub fn new(store: impl PhotoStore + 'static) -> Self {
        Self(Rc::new(store))
    }
}

impl PartialEq for SharedStore {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HttpPhotoStore {
    base: String,
}

#[derive(Deserialize)]
struct OwnerReply {
    owner: bool,
}

impl HttpPhotoStore {
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

fn encode_segment(segment: &str) -> String {
    String::from(js_sys::encode_uri_component(segment))
}

async fn send(method: &str, url: String, body: Option<String>) -> Result<Response, StoreError> {
    let window = web_sys::window().ok_or(StoreError::NoWindow)?;
    let init = RequestInit::new();
    init.set_method(method);
    init.set_credentials(RequestCredentials::Include);
    if let Some(body) = &body {
        init.set_body(&wasm_bindgen::JsValue::from_str(body));
    }
    let request = Request::new_with_str_and_init(&url, &init)?;
    request.headers().set("Accept", "application/json")?;
    if body.is_some() {
        request.headers().set("Content-Type", "application/json")?;
    }
    let resp_value = JsFuture::from(window.fetch_with_request(&request)).await?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| StoreError::Decode("fetch did not return a Response".into()))?;
    match resp.status() {
        200..=299 => Ok(resp),
        404 => Err(StoreError::NotFound(url)),
        status => Err(StoreError::Status(status)),
    }
}

async fn fetch_json<T: DeserializeOwned>(url: String) -> Result<T, StoreError> {
    let resp = send("GET", url, None).await?;
    let text = JsFuture::from(resp.text()?).await?;
    let text = text
        .as_string()
        .ok_or_else(|| StoreError::Decode("response body is not text".into()))?;
    Ok(serde_json::from_str(&text)?)
}

impl PhotoStore for HttpPhotoStore {
    fn canvas_by_slug(&self, slug: &str) -> StoreFuture<Canvas> {
        let url = self.url(&format!("canvases/{}", encode_segment(slug)));
        Box::pin(fetch_json(url))
    }

    fn list_photos(&self, canvas_id: &str) -> StoreFuture<Vec<Photo>> {
        let url = self.url(&format!("canvases/{}/photos", encode_segment(canvas_id)));
        Box::pin(fetch_json(url))
    }

    fn move_photo(&self, photo_id: &PhotoId, position: LogicalPosition) -> StoreFuture<()> {
        let url = self.url(&format!("photos/{}/move", encode_segment(&photo_id.0)));
        Box::pin(async move {
            let body = serde_json::to_string(&position)?;
            send("POST", url, Some(body)).await.map(|_| ())
        })
    }

    fn viewer_is_owner(&self, canvas_id: &str) -> StoreFuture<bool> {
        let url = self.url(&format!("canvases/{}/owner", encode_segment(canvas_id)));
        Box::pin(async move {
            let reply: OwnerReply = fetch_json(url).await?;
            Ok(reply.owner)
        })
    }
}

/// Persists one released drag. Failures are logged and reported as `false`;
/// nothing is retried.
pub fn persist_move(
    store: &dyn PhotoStore,
    request: &MoveRequest,
) -> Pin<Box<dyn Future<Output = bool>>> {
    let fut = store.move_photo(&request.photo_id, request.position);
    let photo_id = request.photo_id.clone();
    Box::pin(async move {
        match fut.await {
            Ok(()) => true,
            Err(err) => {
                cwarn(&format!("move of {photo_id} failed: {err}"));
                false
            }
        }
    })
}
