mod fake_gitlab;

pub use fake_gitlab::{FakeGitLab, Routes};
