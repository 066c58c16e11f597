pub mod alias_graph;
pub mod analysis;
pub mod commit_record;
pub mod defaults;
pub mod git_binary;
pub mod git_url;
pub mod github;
pub mod identity;
pub mod input_enumerator;
pub mod name_emails;
pub mod progress;
pub mod registry;
pub mod report;
pub mod verifier;
