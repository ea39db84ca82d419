pub mod fixtures;

pub use fixtures::{
    LogRowBuilder, reference_now, sample_batch, write_jsonl, write_plain_log,
};
