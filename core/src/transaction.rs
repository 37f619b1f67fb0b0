use std::thread::{self, ThreadId};

use crate::error::{GridError, Result};

/// Nesting counter for grid transactions, bound to the thread that opened
/// the outermost one.
///
/// `depth > 0` iff `owner_thread` is set.
#[derive(Debug, Default)]
pub struct TransactionState {
    depth: u32,
    owner_thread: Option<ThreadId>,
}

impl TransactionState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.depth > 0
    }

    #[inline]
    fn check_owner_thread(&self) -> Result<()> {
        match self.owner_thread {
            Some(owner) if owner != thread::current().id() => {
                log::error!(
                    "transaction opened by {:?} used from {:?}",
                    owner,
                    thread::current().id()
                );
                Err(GridError::ForeignThread)
            }
            _ => Ok(()),
        }
    }

    /// Opens a (possibly nested) transaction.
    ///
    /// Returns `true` if this call opened the outermost transaction.
    pub fn begin(&mut self) -> Result<bool> {
        if self.depth == 0 {
            self.owner_thread = Some(thread::current().id());
            self.depth = 1;
            return Ok(true);
        }
        self.check_owner_thread()?;
        self.depth += 1;
        Ok(false)
    }

    /// Closes one nesting level.
    ///
    /// Returns `true` if this call closed the outermost transaction.
    pub fn end(&mut self) -> Result<bool> {
        if self.depth == 0 {
            log::error!("end_transaction without an open transaction");
            return Err(GridError::NoTransaction);
        }
        self.check_owner_thread()?;
        self.depth -= 1;
        if self.depth == 0 {
            self.owner_thread = None;
            return Ok(true);
        }
        Ok(false)
    }
}
