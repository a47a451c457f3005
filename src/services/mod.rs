pub mod challenge_guard;
pub mod drive_auth;
pub mod drive_client;
pub mod drive_listing;
pub mod keyword_matcher;
pub mod linkedin_service;
pub mod profile_scraper;

pub use challenge_guard::{ChallengeGuard, ChallengeOutcome, ChallengeProbe};
pub use drive_auth::DriveAuth;
pub use drive_client::DriveClient;
pub use drive_listing::{render_files, FileListing};
pub use keyword_matcher::{Doc, KeywordMatcher, PhraseNormalizer};
pub use linkedin_service::{LinkedInCredentials, LinkedInService};
pub use profile_scraper::ProfileScraper;
