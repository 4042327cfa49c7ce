//! Helpers shared by the CLI unit tests.

/// Captures stdout and stderr of a single command run.
#[derive(Debug, Default)]
pub(super) struct Captured {
    pub(super) out: Vec<u8>,
    pub(super) err: Vec<u8>,
}

impl Captured {
    pub(super) fn stdout(&self) -> String {
        String::from_utf8(self.out.clone()).expect("stdout is utf-8")
    }

    pub(super) fn stderr(&self) -> String {
        String::from_utf8(self.err.clone()).expect("stderr is utf-8")
    }
}
