//! `-nofoo` handling
//!
//! `-nofoo` means `-foo=0` and `-nofoo=0` means `-foo=1`, as long as `-foo`
//! itself was not given. The rewrite runs once after command-line parsing
//! and once per config-file entry; nothing records that a key was already
//! considered, so the outcome depends on which source was merged first.

use super::SettingsMaps;

const NEGATIVE_PREFIX: &str = "-no";

impl SettingsMaps {
    pub(crate) fn interpret_negative(&mut self, key: &str) {
        let Some(rest) = key.strip_prefix(NEGATIVE_PREFIX) else {
            return;
        };

        let positive = format!("-{}", rest);
        if self.args.contains_key(&positive) {
            return;
        }

        let value = !self.get_bool(key, false);
        self.args.insert(positive, if value { "1" } else { "0" }.to_string());
    }
}
