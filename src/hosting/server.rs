use super::*;
use crate::UserId;
use crate::gameroom::Lobby;
use crate::session::Session;
use actix_cors::Cors;
use actix_web::App;
use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::HttpServer;
use actix_web::Responder;
use actix_web::middleware::Logger;
use actix_web::web;
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;

pub struct Server;

impl Server {
    pub async fn run(lobby: Arc<Lobby>) -> Result<(), std::io::Error> {
        let state = web::Data::from(lobby);
        let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        log::info!("starting landlord server on {}", bind);
        HttpServer::new(move || {
            App::new()
                .wrap(Logger::new("%r %s %Ts"))
                .wrap(
                    Cors::default()
                        .allow_any_origin()
                        .allow_any_method()
                        .allow_any_header(),
                )
                .app_data(state.clone())
                .route("/ws", web::get().to(connect))
        })
        .workers(4)
        .bind(bind)?
        .run()
        .await
    }
}

/// upgrade to a websocket and spawn the session bridge; identity comes
/// from the login cookies, a missing identity refuses the connection
async fn connect(
    lobby: web::Data<Lobby>,
    req: HttpRequest,
    body: web::Payload,
) -> impl Responder {
    let Some((id, name)) = identify(&req) else {
        log::error!("user needs to login first");
        return HttpResponse::Unauthorized().finish();
    };
    match actix_ws::handle(&req, body) {
        Ok((response, socket, stream)) => {
            let (tx, rx) = unbounded_channel();
            let session = Session::human(id, name, lobby.into_inner(), tx);
            log::info!("user [{}] connected", session.id);
            actix_web::rt::spawn(bridge(session, rx, socket, stream));
            response
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}

fn identify(req: &HttpRequest) -> Option<(UserId, String)> {
    let id = req.cookie("userid")?.value().parse::<UserId>().ok()?;
    let name = req.cookie("username")?.value().to_string();
    (id != 0 && !name.is_empty()).then_some((id, name))
}
