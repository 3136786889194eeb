//! Loopback HTTP server answering a fixed script of responses.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

pub(crate) struct StubServer {
	url: String,
	requests: Arc<Mutex<Vec<String>>>,
}

impl StubServer {
	/// Serve one `(status, body)` pair per incoming connection, in order.
	pub(crate) fn serve(responses: Vec<(u16, String)>) -> Self {
		Self::route(
			responses
				.into_iter()
				.map(|(status, body)| ("", status, body))
				.collect(),
		)
	}

	/// Answer each connection with the first unused route whose needle occurs
	/// in the lowercased request, so concurrent clients get stable replies.
	pub(crate) fn route(routes: Vec<(&'static str, u16, String)>) -> Self {
		let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
		let url = format!("http://{}/api/", listener.local_addr().expect("local addr"));
		let requests = Arc::new(Mutex::new(Vec::new()));
		let seen = Arc::clone(&requests);

		thread::spawn(move || {
			let mut routes: Vec<Option<(&str, u16, String)>> = routes.into_iter().map(Some).collect();
			while routes.iter().any(Option::is_some) {
				let Ok((mut stream, _)) = listener.accept() else {
					return;
				};
				let request = read_request(&mut stream);
				let lowered = request.to_lowercase();
				seen.lock().unwrap().push(request);

				let (status, body) = routes
					.iter_mut()
					.find(|slot| {
						slot.as_ref()
							.is_some_and(|(needle, _, _)| lowered.contains(needle))
					})
					.and_then(Option::take)
					.map_or((500, "unexpected request".to_string()), |(_, status, body)| {
						(status, body)
					});
				let reply = format!(
					"HTTP/1.1 {status} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
					reason(status),
					body.len()
				);
				let _ = stream.write_all(reply.as_bytes());
				let _ = stream.flush();
			}
		});

		Self { url, requests }
	}

	pub(crate) fn url(&self) -> &str {
		&self.url
	}

	/// Raw request head and body of every connection served so far.
	pub(crate) fn requests(&self) -> Vec<String> {
		self.requests.lock().unwrap().clone()
	}
}

fn reason(status: u16) -> &'static str {
	match status {
		200 => "OK",
		400 => "Bad Request",
		401 => "Unauthorized",
		500 => "Internal Server Error",
		503 => "Service Unavailable",
		_ => "Status",
	}
}

fn read_request(stream: &mut TcpStream) -> String {
	let mut reader = BufReader::new(stream);
	let mut head = String::new();
	let mut content_length = 0usize;
	loop {
		let mut line = String::new();
		if reader.read_line(&mut line).unwrap_or(0) == 0 {
			break;
		}
		if let Some((name, value)) = line.split_once(':')
			&& name.eq_ignore_ascii_case("content-length")
		{
			content_length = value.trim().parse().unwrap_or(0);
		}
		let end_of_head = line == "\r\n";
		head.push_str(&line);
		if end_of_head {
			break;
		}
	}

	let mut body = vec![0; content_length];
	let _ = reader.read_exact(&mut body);
	head.push_str(&String::from_utf8_lossy(&body));
	head
}
