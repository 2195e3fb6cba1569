#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use commissions::Commission;

pub const SAMPLE_COMMISSIONS: &str = r#"[
  {
    "commission_id": 1, "sales_rep_id": 7, "commission_amount": 10.0,
    "date_paid": "2024-03-15",
    "invoice": {"invoice_id": 7, "final_total": 100.0, "status": "Paid", "paid": true,
                "account": {"account_id": 1, "business_name": "Acme"}}
  },
  {
    "commission_id": 2, "sales_rep_id": 7, "commission_amount": 25.5,
    "date_paid": "2024-03-20T10:00:00",
    "invoice": {"invoice_id": 8, "final_total": 255.0, "status": "Pending", "paid": false,
                "account": {"account_id": 1, "business_name": "Acme"}}
  },
  {
    "commission_id": 3, "sales_rep_id": 7, "commission_amount": 5.0,
    "date_paid": "2023-11-02",
    "invoice": {"invoice_id": 9, "final_total": 50.0, "paid": true,
                "account": {"account_id": 2, "business_name": "Globex"}}
  },
  {
    "commission_id": 4, "sales_rep_id": 7, "commission_amount": 12.0,
    "date_paid": "N/A",
    "invoice": {"invoice_id": 10, "final_total": 120.0, "paid": true,
                "account": {"account_id": 3, "business_name": "Initech"}}
  },
  {
    "commission_id": 5, "sales_rep_id": 7, "commission_amount": 7.0,
    "date_paid": "2024-06-01",
    "invoice": null
  },
  {
    "commission_id": 6, "sales_rep_id": 7, "commission_amount": null,
    "date_paid": "2024-03-01",
    "invoice": {"invoice_id": null, "final_total": null, "paid": true,
                "account": {"account_id": 4, "business_name": null}}
  },
  {
    "commission_id": 7, "sales_rep_id": 7, "commission_amount": 4.0,
    "date_paid": "2019-07-04",
    "invoice": {"invoice_id": 12, "final_total": 40.0, "paid": true, "account": null}
  },
  {
    "commission_id": 8, "sales_rep_id": 7, "commission_amount": 6.0,
    "date_paid": "2019-07-04",
    "invoice": {"invoice_id": 13, "final_total": 60.0, "paid": true}
  },
  {
    "commission_id": 9, "sales_rep_id": 7, "commission_amount": 8.0,
    "date_paid": "2019-07-04",
    "invoice": {"invoice_id": 14, "final_total": 80.0, "paid": true,
                "account": {"business_name": "Hooli"}}
  }
]"#;

pub fn sample_commissions() -> Vec<Commission> {
    serde_json::from_str(SAMPLE_COMMISSIONS).unwrap()
}

/// Routes answering a full dashboard load for sales rep 7 in March 2024
pub fn dashboard_routes() -> Vec<(&'static str, String)> {
    vec![
        ("/commissions", SAMPLE_COMMISSIONS.to_string()),
        ("/commissions/current_month", r#"{"total_commissions": 120.5}"#.to_string()),
        ("/commissions/current_year", r#"{"total_commissions": 1500}"#.to_string()),
        ("/commissions/last_year", r#"{"total_commissions": null}"#.to_string()),
        ("/commissions/projected", r#"{"projected_commissions": 4200.25}"#.to_string()),
        ("/commissions/all_years", "[2024, 2023, 2024]".to_string()),
        (
            "/commissions/monthly/2024",
            "[0, 0, 35.5, 0, 0, 7, 0, 0, 0, 0, 0, null]".to_string(),
        ),
        ("/commissions/weekly/2024/3", "[3, 10, 25.5]".to_string()),
        ("/commissions/yearly", r#"{"2023": 5.0, "2024": 45.5}"#.to_string()),
    ]
}

/// Minimal HTTP server answering GET requests from a fixed route table.
/// Unknown paths get a 404. Every request target is recorded in arrival order.
pub struct StubApi {
    pub base_url: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl StubApi {
    pub fn start(routes: Vec<(&'static str, String)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let requests = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&requests);

        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(mut stream) = stream else { continue };

                let Ok(read_half) = stream.try_clone() else { continue };
                let mut reader = BufReader::new(read_half);
                let mut request_line = String::new();
                let Ok(n) = reader.read_line(&mut request_line) else { continue };
                if n == 0 {
                    continue;
                }
                loop {
                    let mut header = String::new();
                    match reader.read_line(&mut header) {
                        Ok(n) if n > 0 && header != "\r\n" => {}
                        _ => break,
                    }
                }

                let target = request_line
                    .split_whitespace()
                    .nth(1)
                    .unwrap_or("/")
                    .to_string();
                let path = target.split('?').next().unwrap_or("/").to_string();
                if let Ok(mut log) = log.lock() {
                    log.push(target);
                }

                let response = match routes.iter().find(|(p, _)| *p == path) {
                    Some((_, body)) => format!(
                        "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        body.len(),
                        body
                    ),
                    None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                        .to_string(),
                };
                if stream.write_all(response.as_bytes()).is_err() {
                    continue;
                }
                let _ = stream.flush();
            }
        });

        Self { base_url, requests }
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|t| t.split('?').next().unwrap_or("").to_string())
            .collect()
    }
}
