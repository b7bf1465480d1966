use crate::server::{Server, UpdateHandler};
use crate::telegram::Update;
use std::convert::Infallible;
use std::sync::Arc;
use warp::Filter;

/// Webhook update feed: the transport POSTs one `Update` per request and
/// only needs an immediate acknowledgement; handling happens in a detached
/// task per update, same as the polling feed.
pub fn routes(
    server: Arc<Server>,
) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone {
    warp::post()
        .and(warp::path("webhook"))
        .and(warp::path::end())
        .and(warp::body::json())
        .and(with(server.update_handler.clone()))
        .and_then(receive_update)
}

async fn receive_update(
    update: Update,
    handler: Arc<UpdateHandler>,
) -> Result<impl warp::Reply, Infallible> {
    tokio::spawn(async move {
        handler.handle_update(update).await;
    });
    Ok(warp::reply())
}

fn with<ServiceType>(
    service: Arc<ServiceType>,
) -> impl Filter<Extract = (Arc<ServiceType>,), Error = Infallible> + Clone
where
    ServiceType: Send + Sync + ?Sized,
{
    warp::any().map(move || service.clone())
}
