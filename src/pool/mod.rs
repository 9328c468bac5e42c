//! The embedded sentence pool that session targets are drawn from.

use include_dir::{include_dir, Dir};
use itertools::Itertools;
use rand::seq::SliceRandom;
use serde::Deserialize;

static POOL_DIR: Dir = include_dir!("src/pool");

#[allow(dead_code)]
#[derive(Deserialize, Clone, Debug)]
pub struct SentencePool {
    pub name: String,
    pub size: u32,
    pub sentences: Vec<String>,
}

impl SentencePool {
    /// Load the embedded pool. The file ships inside the binary, so failure
    /// here is a build defect rather than a runtime condition.
    pub fn load() -> Self {
        let file = POOL_DIR
            .get_file("sentences.json")
            .expect("Sentence pool file not found");

        let raw = file
            .contents_utf8()
            .expect("Unable to interpret sentence pool as a string");

        serde_json::from_str(raw).expect("Unable to deserialize sentence pool json")
    }

    /// Sample `count` distinct sentences and join them into one target text,
    /// separated by single spaces. `count` is clamped to the pool size.
    pub fn draw_target(&self, count: usize) -> String {
        let mut rng = rand::thread_rng();
        self.sentences
            .choose_multiple(&mut rng, count.min(self.sentences.len()))
            .join(" ")
    }
}
