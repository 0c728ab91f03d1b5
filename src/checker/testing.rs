// src/checker/testing.rs
// A Fetch implementation that answers from a script and records every call.
// Unknown URLs answer 404.

use std::collections::HashMap;
use std::sync::Mutex;

use super::http::{Fetch, HttpReply, TransportError};

#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    script: HashMap<String, Result<HttpReply, TransportError>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, url: &str, reply: HttpReply) -> Self {
        self.script.insert(url.to_string(), Ok(reply));
        self
    }

    pub fn fail(mut self, url: &str, error: TransportError) -> Self {
        self.script.insert(url.to_string(), Err(error));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == url).count()
    }
}

impl Fetch for ScriptedFetcher {
    async fn get(&self, url: &str) -> Result<HttpReply, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());
        self.script
            .get(url)
            .cloned()
            .unwrap_or(Ok(HttpReply::new(404)))
    }
}
