use std::collections::HashMap;

use actix_web::{error, web, Error, HttpRequest, HttpResponse};

use crate::functions::{Function, FunctionRequest};

pub struct AppState {
    functions: HashMap<&'static str, Box<dyn Function>>,
}

impl AppState {
    pub fn new(functions: Vec<Box<dyn Function>>) -> Self {
        let functions = functions
            .into_iter()
            .map(|function| (function.name(), function))
            .collect();
        Self { functions }
    }

    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

async fn invoke(
    path: web::Path<(String,)>,
    request: HttpRequest,
    body: web::Bytes,
    data: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let (name,) = path.into_inner();

    let function = data.functions.get(name.as_str()).ok_or_else(|| {
        tracing::warn!("no function named {}", name);
        error::ErrorNotFound("function not found")
    })?;

    tracing::info!("{} /{}", request.method(), name);
    let response = function
        .invoke(FunctionRequest::new(request.method().clone(), body))
        .await;

    Ok(response.into())
}

/// Serves each function at `/{name}` and at the hosted-functions path
/// `/.netlify/functions/{name}` the PWA was built against.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/.netlify/functions/{function}", web::route().to(invoke))
        .route("/{function}", web::route().to(invoke));
}
