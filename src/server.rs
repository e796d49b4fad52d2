// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A local web page for reviewing cropped icons one by one.
//!
//! Requests are handled sequentially on the calling thread.

use std::borrow::Cow;
use std::collections::HashMap;
use std::io::Read;

use tiny_http::{Header, Method, Request, Response, Server, StatusCode};

use crate::session::Session;
use crate::Error;

/// Server configuration.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// A local port to listen on.
    ///
    /// Default: 8080
    pub port: u16,

    /// Open the start page in the default browser.
    ///
    /// Default: true
    pub open_browser: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            open_browser: true,
        }
    }
}

/// A response to send.
#[derive(Clone, PartialEq, Debug)]
pub struct Reply {
    pub status: u16,
    pub html: String,
    /// All icons were processed and the server should stop.
    pub finished: bool,
}

impl Reply {
    fn page(html: String) -> Self {
        Reply {
            status: 200,
            html,
            finished: false,
        }
    }
}

/// Runs the server until all icons are processed.
pub fn run(mut session: Session, config: &Config) -> Result<(), Error> {
    let addr = ("127.0.0.1", config.port);
    let server = Server::http(addr).map_err(|e| {
        Error::Io(std::io::Error::new(
            std::io::ErrorKind::AddrInUse,
            format!("failed to listen on port {} cause {}", config.port, e),
        ))
    })?;

    let url = format!("http://localhost:{}", config.port);
    log::info!("Goto {} to start cropping (Ctrl+C to exit).", url);

    if config.open_browser {
        if let Err(e) = open::that(&url) {
            log::warn!("Failed to open a browser cause {}.", e);
        }
    }

    for mut request in server.incoming_requests() {
        let mut body = Vec::new();
        let reply = match request.as_reader().read_to_end(&mut body) {
            Ok(_) => handle(&mut session, request.method(), request.url(), &body),
            Err(e) => {
                log::warn!("Failed to read a request cause {}.", e);
                bad_request()
            }
        };

        let finished = reply.finished;
        if let Err(e) = respond(request, reply) {
            log::warn!("Failed to send a response cause {}.", e);
        }

        if finished {
            log::info!("All icons are processed.");
            break;
        }
    }

    Ok(())
}

fn respond(request: Request, reply: Reply) -> std::io::Result<()> {
    let mut response = Response::from_string(reply.html).with_status_code(StatusCode(reply.status));
    if let Ok(header) = Header::from_bytes("Content-Type", "text/html; charset=utf-8") {
        response = response.with_header(header);
    }

    request.respond(response)
}

/// Handles a single request.
///
/// A body that is not UTF-8 is rejected with 400.
pub fn handle(session: &mut Session, method: &Method, url: &str, body: &[u8]) -> Reply {
    if std::str::from_utf8(body).is_err() {
        log::warn!("Rejected a request to {} with a non UTF-8 body.", url);
        return bad_request();
    }

    let path = url.split('?').next().unwrap_or(url);
    match (method, path) {
        (Method::Get, "/") => Reply::page(welcome_page(session)),
        (Method::Post, "/crop") => {
            let form: HashMap<String, String> =
                url::form_urlencoded::parse(body).into_owned().collect();
            crop_next(session, &form)
        }
        _ => Reply {
            status: 404,
            html: page("Not Found", "<h1>404 Not Found</h1>"),
            finished: false,
        },
    }
}

fn bad_request() -> Reply {
    Reply {
        status: 400,
        html: page("Bad Request", "<h1>400 Bad Request</h1>"),
        finished: false,
    }
}

fn crop_next(session: &mut Session, form: &HashMap<String, String>) -> Reply {
    let start = form.contains_key("start");
    if !start && !form.contains_key("content") {
        return Reply::page(done_page(session, &[]));
    }

    let mut notices = Vec::new();

    if start {
        if let Err(e) = session.restart() {
            log::warn!("Failed to read the icons list cause {}.", e);
            notices.push(format!("Failed to read the icons list: {}.", e));
        }
    }

    if let (Some(name), Some(content)) = (form.get("name"), form.get("content")) {
        if !name.is_empty() && !content.is_empty() {
            if let Err(e) = session.save(name, content) {
                log::warn!("Failed to save {} cause {}.", name, e);
                notices.push(format!("Failed to save {}: {}.", name, e));
            }
        }
    }

    while let Some(icon) = session.next_icon() {
        let icon = match icon {
            Ok(v) => v,
            Err(e) => {
                log::warn!("Failed to read an icon cause {}.", e);
                notices.push(format!("Failed to read an icon: {}.", e));
                continue;
            }
        };

        match session.crop_icon(&icon) {
            Ok(cropped) => return Reply::page(crop_page(session, &icon.name, &cropped, &notices)),
            Err(e) => {
                log::warn!("Failed to crop {} cause {}.", icon.name, e);
                notices.push(format!("Failed to crop {}: {}.", icon.name, e));
            }
        }
    }

    Reply {
        status: 200,
        html: done_page(session, &notices),
        finished: true,
    }
}

fn welcome_page(session: &Session) -> String {
    let body = format!(
        "<h1>Icon cropper</h1>\n\
         <p>Input directory: <code>{}</code></p>\n\
         <p>Output directory: <code>{}</code></p>\n\
         <form method=\"post\" action=\"/crop\">\n\
         <button type=\"submit\" name=\"start\" value=\"1\">Start</button>\n\
         </form>",
        escape_html(&session.svg_dir().display().to_string()),
        escape_html(&session.out_dir().display().to_string()),
    );
    page("Icon cropper", &body)
}

fn crop_page(session: &Session, name: &str, svg: &str, notices: &[String]) -> String {
    let body = format!(
        "{notices}<h1>{name}</h1>\n\
         <p>{done} of {total}</p>\n\
         <div class=\"preview\">{svg}</div>\n\
         <form method=\"post\" action=\"/crop\">\n\
         <input type=\"hidden\" name=\"name\" value=\"{name}\">\n\
         <textarea name=\"content\" rows=\"12\" cols=\"80\">{content}</textarea>\n\
         <button type=\"submit\">Save and continue</button>\n\
         </form>",
        notices = notices_html(notices),
        name = escape_html(name),
        done = session.len() - session.remaining(),
        total = session.len(),
        svg = svg,
        content = escape_html(svg),
    );
    page(name, &body)
}

fn done_page(session: &Session, notices: &[String]) -> String {
    let body = format!(
        "{}<h1>Done</h1>\n\
         <p>Cropped icons are in <code>{}</code>.</p>",
        notices_html(notices),
        escape_html(&session.out_dir().display().to_string()),
    );
    page("Done", &body)
}

fn notices_html(notices: &[String]) -> String {
    notices
        .iter()
        .map(|n| format!("<p class=\"notice\">{}</p>\n", escape_html(n)))
        .collect()
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>{}</title>\n\
         <style>\
         .preview svg {{ width: 256px; height: 256px; outline: 1px dashed #999; }}\
         .notice {{ color: #b00; }}\
         </style>\n\
         </head>\n\
         <body>\n{}\n</body>\n\
         </html>\n",
        escape_html(title),
        body
    )
}

/// Escapes special HTML characters.
fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(&['&', '<', '>', '"', '\''][..]) {
        return Cow::Borrowed(s);
    }

    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;"),
    )
}
