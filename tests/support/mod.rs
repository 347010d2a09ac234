// Copyright (C) 2018 Stephane Raux. Distributed under the MIT license.

use hyper::header::{HeaderName, ACCEPT, CONTENT_TYPE, USER_AGENT};
use hyper::server::conn::AddrStream;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{mpsc, Arc, Mutex};
use std::thread;

/// Request as seen by the mock server.
#[derive(Clone, Debug)]
pub struct Recorded {
    pub path_and_query: String,
    pub user_agent: Option<String>,
    pub accept: Option<String>,
}

/// Canned HTTP server on a loopback port, running on its own thread.
pub struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    /// Starts a server answering every request with `reply(path_and_query)`.
    pub fn start<F>(reply: F) -> Self
    where
        F: Fn(&str) -> (u16, String) + Send + Sync + 'static,
    {
        let reply = Arc::new(reply);
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorded = requests.clone();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let make_service = make_service_fn(move |_: &AddrStream| {
                    let reply = reply.clone();
                    let recorded = recorded.clone();
                    async move {
                        Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                            let response = respond(&*reply, &recorded, &req);
                            async move { Ok::<_, Infallible>(response) }
                        }))
                    }
                });
                let server = Server::bind(&([127, 0, 0, 1], 0).into())
                    .serve(make_service);
                tx.send(server.local_addr()).unwrap();
                server.await.unwrap();
            });
        });
        let addr = rx.recv().unwrap();
        MockServer {addr, requests}
    }

    /// Starts a server answering every request with the same status and body.
    pub fn fixed(status: u16, body: &str) -> Self {
        let body = body.to_string();
        Self::start(move |_| (status, body.clone()))
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("no request received")
    }
}

fn respond<F>(reply: &F, recorded: &Mutex<Vec<Recorded>>, req: &Request<Body>)
    -> Response<Body>
where
    F: Fn(&str) -> (u16, String),
{
    let path_and_query = req.uri().path_and_query()
        .map_or_else(|| req.uri().path().to_string(), |pq| pq.to_string());
    let header = |name: HeaderName| {
        req.headers().get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    recorded.lock().unwrap().push(Recorded {
        path_and_query: path_and_query.clone(),
        user_agent: header(USER_AGENT),
        accept: header(ACCEPT),
    });
    let (status, body) = reply(&path_and_query);
    Response::builder()
        .status(StatusCode::from_u16(status).unwrap())
        .header(CONTENT_TYPE, "application/json; charset=utf-8")
        .body(Body::from(body))
        .unwrap()
}

/// Loopback address nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
