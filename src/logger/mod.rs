//! Activity logging: channel-fed JSONL append-only log.

pub mod activity;
pub mod jsonl;
