//! Reassembly of embedded link control fragments.
//!
//! The EMB parser is stateless per burst; the caller feeds each burst's LCSS
//! tag and 32-bit fragment into an [`LcAssembler`] it owns.

use tracing::debug;

use crate::emb::{Lcss, EMB_LC_FRAGMENT_BITS};

/// Longest embedded LC message, in fragments.
pub const MAX_FRAGMENTS: usize = 4;

/// Collects embedded LC fragments across consecutive voice bursts.
#[derive(Debug, Default, Clone)]
pub struct LcAssembler {
    buf: Vec<u8>,
    active: bool,
}

impl LcAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one burst's fragment. Returns the complete message bits once the
    /// final fragment arrives.
    ///
    /// Fragments that are not 32 bits wide, or that arrive out of sequence,
    /// discard any partial message.
    pub fn push(&mut self, lcss: Lcss, fragment: &[u8]) -> Option<Vec<u8>> {
        if fragment.len() != EMB_LC_FRAGMENT_BITS {
            debug!(len = fragment.len(), "dropping malformed lc fragment");
            self.reset();
            return None;
        }

        match lcss {
            Lcss::Single => {
                self.reset();
                Some(fragment.to_vec())
            }
            Lcss::First => {
                self.reset();
                self.buf.extend_from_slice(fragment);
                self.active = true;
                None
            }
            Lcss::Continuation | Lcss::Last if !self.active => {
                debug!(%lcss, "lc fragment without a first fragment");
                None
            }
            Lcss::Continuation => {
                self.buf.extend_from_slice(fragment);
                if self.fragments() >= MAX_FRAGMENTS {
                    debug!("lc message exceeds maximum length");
                    self.reset();
                }
                None
            }
            Lcss::Last => {
                self.buf.extend_from_slice(fragment);
                self.active = false;
                Some(std::mem::take(&mut self.buf))
            }
        }
    }

    /// Drop any partial message.
    pub fn reset(&mut self) {
        self.buf.clear();
        self.active = false;
    }

    /// Number of fragments buffered so far.
    pub fn fragments(&self) -> usize {
        self.buf.len() / EMB_LC_FRAGMENT_BITS
    }
}
