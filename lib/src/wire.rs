//! Big-endian wire primitives shared by the header, transaction and script codecs.

use crate::error::{CoinError, Result};
use crate::sha256::Hash;
use crate::U256;

pub struct Reader<'a> {
    b: &'a [u8],
    off: usize,
}

impl<'a> Reader<'a> {
    pub fn new(b: &'a [u8]) -> Self {
        Self { b, off: 0 }
    }

    pub fn offset(&self) -> usize {
        self.off
    }

    pub fn remaining(&self) -> usize {
        self.b.len() - self.off
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fails if any input is left unread
    pub fn finish(&self) -> Result<()> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(CoinError::TooMuchData(n)),
        }
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(CoinError::NotEnoughData("unexpected EOF (bytes)"));
        }
        let v = &self.b[self.off..self.off + n];
        self.off += n;
        Ok(v)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        if N > self.remaining() {
            return Err(CoinError::NotEnoughData("unexpected EOF (array)"));
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&self.b[self.off..self.off + N]);
        self.off += N;
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    pub fn read_u64_be(&mut self) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    pub fn read_u256_be(&mut self) -> Result<U256> {
        Ok(U256::from_big_endian(&self.read_array::<32>()?))
    }

    pub fn read_hash(&mut self) -> Result<Hash> {
        Ok(Hash::new(self.read_array()?))
    }

    /// Reads a compact size integer and rejects non-minimal forms
    pub fn read_var_int(&mut self) -> Result<u64> {
        let tag = self.read_u8()?;
        let (v, minimal_ok) = match tag {
            0x00..=0xfc => (tag as u64, true),
            0xfd => {
                let v = self.read_u16_be()? as u64;
                (v, v >= 0xfd)
            }
            0xfe => {
                let v = self.read_u32_be()? as u64;
                (v, v > 0xffff)
            }
            0xff => {
                let v = self.read_u64_be()?;
                (v, v > 0xffff_ffff)
            }
        };
        if !minimal_ok {
            return Err(CoinError::NonMinimalEncoding("var int"));
        }
        Ok(v)
    }

    /// Reads a var int length followed by that many bytes
    pub fn read_var_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_var_int()?;
        let len = usize::try_from(len).map_err(|_| CoinError::NotEnoughData("length prefix"))?;
        self.read_bytes(len)
    }
}

pub fn write_var_int(n: u64, out: &mut Vec<u8>) {
    match n {
        0x00..=0xfc => out.push(n as u8),
        0xfd..=0xffff => {
            out.push(0xfd);
            out.extend_from_slice(&(n as u16).to_be_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            out.push(0xfe);
            out.extend_from_slice(&(n as u32).to_be_bytes());
        }
        _ => {
            out.push(0xff);
            out.extend_from_slice(&n.to_be_bytes());
        }
    }
}

pub fn write_var_bytes(bytes: &[u8], out: &mut Vec<u8>) {
    write_var_int(bytes.len() as u64, out);
    out.extend_from_slice(bytes);
}

pub fn write_u256_be(n: &U256, out: &mut Vec<u8>) {
    out.extend_from_slice(&n.to_big_endian());
}
