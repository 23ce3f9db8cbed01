//! DPAPI memory protection
//!
//! Uses `CryptProtectMemory` / `CryptUnprotectMemory` with
//! `CRYPTPROTECTMEMORY_SAME_PROCESS`, so sealed buffers can only be unsealed
//! by the process that sealed them. A byte-for-byte copy of a sealed buffer
//! stays valid within the process, which is what `duplicate` relies on.

use std::ffi::c_void;

use windows_sys::Win32::Security::Cryptography::{
  CRYPTPROTECTMEMORY_BLOCK_SIZE, CRYPTPROTECTMEMORY_SAME_PROCESS, CryptProtectMemory, CryptUnprotectMemory,
};

use crate::error::{CredentialError, Result};
use crate::secret::SecretProtector;

/// Host protected-memory facility backed by DPAPI
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformProtector;

/// DPAPI takes a `u32` length that must be a multiple of the block size
fn checked_len(buf: &[u8]) -> Result<u32> {
  let block = CRYPTPROTECTMEMORY_BLOCK_SIZE as usize;
  if buf.is_empty() || buf.len() % block != 0 {
    return Err(CredentialError::Protection(format!(
      "buffer of {} bytes is not a non-zero multiple of {block}",
      buf.len()
    )));
  }
  u32::try_from(buf.len()).map_err(|e| CredentialError::Protection(format!("secret too large: {e}")))
}

fn last_error(call: &str) -> CredentialError {
  CredentialError::Protection(format!("{call} failed: {}", std::io::Error::last_os_error()))
}

impl SecretProtector for PlatformProtector {
  fn name(&self) -> &'static str {
    "dpapi"
  }

  fn block_size(&self) -> usize {
    CRYPTPROTECTMEMORY_BLOCK_SIZE as usize
  }

  fn seal(&self, buf: &mut [u8]) -> Result<()> {
    let len = checked_len(buf)?;
    // SAFETY: `buf` is a live, exclusively borrowed allocation of exactly
    // `len` bytes, and `len` is a multiple of the DPAPI block size.
    let ok = unsafe { CryptProtectMemory(buf.as_mut_ptr().cast::<c_void>(), len, CRYPTPROTECTMEMORY_SAME_PROCESS) };
    if ok == 0 {
      return Err(last_error("CryptProtectMemory"));
    }
    Ok(())
  }

  fn unseal(&self, buf: &mut [u8]) -> Result<()> {
    let len = checked_len(buf)?;
    // SAFETY: same invariants as `seal`; the buffer was produced by
    // `CryptProtectMemory` in this process.
    let ok = unsafe { CryptUnprotectMemory(buf.as_mut_ptr().cast::<c_void>(), len, CRYPTPROTECTMEMORY_SAME_PROCESS) };
    if ok == 0 {
      return Err(last_error("CryptUnprotectMemory"));
    }
    Ok(())
  }
}
