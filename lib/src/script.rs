//! Scripts: chunk codec, text form and the PKH family of predicate shapes.
//!
//! Recognizers compare the chunk sequence against fixed templates. Nothing here executes a
//! script.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, FromRepr};

use crate::crypto::{Pkh, PublicKey, TxSignature};
use crate::error::{CoinError, Result};
use crate::script_num::ScriptNum;
use crate::wire::Reader;

/// Relative lock of 90 days of blocks
pub const LOCK_REL_90D: u32 = 12_960;
/// Relative lock of 60 days of blocks
pub const LOCK_REL_60D: u32 = 8_640;
/// Relative lock of 1 hour of blocks
pub const LOCK_REL_1H: u32 = 6;
/// Relative lock of 40 minutes of blocks
pub const LOCK_REL_40M: u32 = 4;

/// Largest payload a single push can carry
pub const MAX_PUSH_SIZE: usize = 0xffff;

/// Largest payload pushed with the length as the opcode itself
const MAX_DIRECT_PUSH: usize = 0x4b;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumString, FromRepr)]
#[repr(u8)]
pub enum Opcode {
    #[strum(serialize = "0")]
    Zero = 0x00,
    #[strum(serialize = "PUSHDATA2")]
    PushData2 = 0x4d,
    #[strum(serialize = "1NEGATE")]
    OneNegate = 0x4f,
    #[strum(serialize = "1")]
    One = 0x51,
    #[strum(serialize = "2")]
    Two = 0x52,
    #[strum(serialize = "3")]
    Three = 0x53,
    #[strum(serialize = "4")]
    Four = 0x54,
    #[strum(serialize = "5")]
    Five = 0x55,
    #[strum(serialize = "6")]
    Six = 0x56,
    #[strum(serialize = "7")]
    Seven = 0x57,
    #[strum(serialize = "8")]
    Eight = 0x58,
    #[strum(serialize = "9")]
    Nine = 0x59,
    #[strum(serialize = "10")]
    Ten = 0x5a,
    #[strum(serialize = "11")]
    Eleven = 0x5b,
    #[strum(serialize = "12")]
    Twelve = 0x5c,
    #[strum(serialize = "13")]
    Thirteen = 0x5d,
    #[strum(serialize = "14")]
    Fourteen = 0x5e,
    #[strum(serialize = "15")]
    Fifteen = 0x5f,
    #[strum(serialize = "16")]
    Sixteen = 0x60,
    #[strum(serialize = "IF")]
    If = 0x63,
    #[strum(serialize = "NOTIF")]
    NotIf = 0x64,
    #[strum(serialize = "ELSE")]
    Else = 0x67,
    #[strum(serialize = "ENDIF")]
    EndIf = 0x68,
    #[strum(serialize = "VERIFY")]
    Verify = 0x69,
    #[strum(serialize = "DROP")]
    Drop = 0x75,
    #[strum(serialize = "DUP")]
    Dup = 0x76,
    #[strum(serialize = "EQUAL")]
    Equal = 0x87,
    #[strum(serialize = "EQUALVERIFY")]
    EqualVerify = 0x88,
    #[strum(serialize = "HASH256")]
    Hash256 = 0xaa,
    #[strum(serialize = "CHECKSIG")]
    CheckSig = 0xac,
    #[strum(serialize = "CHECKLOCKRELVERIFY")]
    CheckLockRelVerify = 0xb2,
}

/// A single opcode, or a push opcode with its payload
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptChunk {
    opcode: u8,
    data: Option<Vec<u8>>,
}

impl ScriptChunk {
    pub fn from_opcode(opcode: Opcode) -> Self {
        Self {
            opcode: opcode as u8,
            data: None,
        }
    }

    /// Push `data` with the shortest push form. An empty payload becomes `0`.
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        let opcode = match data.len() {
            0 => return Ok(Self::from_opcode(Opcode::Zero)),
            len @ 1..=MAX_DIRECT_PUSH => len as u8,
            len if len <= MAX_PUSH_SIZE => Opcode::PushData2 as u8,
            len => {
                return Err(CoinError::InvalidScript(format!(
                    "push of {len} bytes exceeds {MAX_PUSH_SIZE}"
                )))
            }
        };
        Ok(Self {
            opcode,
            data: Some(data),
        })
    }

    pub fn from_script_num(num: &ScriptNum) -> Result<Self> {
        Self::from_data(num.to_bytes())
    }

    pub fn opcode(&self) -> u8 {
        self.opcode
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// Data pushes and small-number opcodes
    pub fn is_push(&self) -> bool {
        self.opcode <= Opcode::Sixteen as u8
    }

    fn is_opcode(&self, opcode: Opcode) -> bool {
        self.data.is_none() && self.opcode == opcode as u8
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        out.push(self.opcode);
        if let Some(data) = &self.data {
            if self.opcode == Opcode::PushData2 as u8 {
                out.extend_from_slice(&(data.len() as u16).to_be_bytes());
            }
            out.extend_from_slice(data);
        }
    }

    pub fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let opcode = reader.read_u8()?;
        match opcode {
            0x01..=0x4b => {
                let data = reader.read_bytes(opcode as usize)?.to_vec();
                Ok(Self {
                    opcode,
                    data: Some(data),
                })
            }
            op if op == Opcode::PushData2 as u8 => {
                let len = reader.read_u16_be()? as usize;
                if len <= MAX_DIRECT_PUSH {
                    return Err(CoinError::NonMinimalEncoding("push data"));
                }
                let data = reader.read_bytes(len)?.to_vec();
                Ok(Self {
                    opcode,
                    data: Some(data),
                })
            }
            op => Opcode::from_repr(op)
                .map(Self::from_opcode)
                .ok_or_else(|| CoinError::InvalidScript(format!("unknown opcode 0x{op:02x}"))),
        }
    }
}

impl std::fmt::Display for ScriptChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.data, Opcode::from_repr(self.opcode)) {
            (Some(data), _) => write!(f, "0x{}", hex::encode(data)),
            (None, Some(op)) => write!(f, "{op}"),
            (None, None) => write!(f, "<0x{:02x}>", self.opcode),
        }
    }
}

impl std::str::FromStr for ScriptChunk {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self> {
        if let Some(hex) = s.strip_prefix("0x") {
            return Self::from_data(hex::decode(hex)?);
        }
        s.parse::<Opcode>()
            .map(Self::from_opcode)
            .map_err(|_| CoinError::InvalidScript(format!("unknown token {s:?}")))
    }
}

/// One element of a script template
#[derive(Clone, Copy)]
enum Pattern {
    Op(Opcode),
    /// Push of exactly this many bytes
    Push(usize),
    /// Push of this script number
    Num(u32),
}

impl Pattern {
    fn matches(&self, chunk: &ScriptChunk) -> bool {
        match *self {
            Pattern::Op(op) => chunk.is_opcode(op),
            Pattern::Push(len) => chunk.data().is_some_and(|d| d.len() == len),
            Pattern::Num(n) => {
                chunk.data() == Some(ScriptNum::from(i64::from(n)).to_bytes().as_slice())
            }
        }
    }
}

use Opcode::{
    CheckLockRelVerify, CheckSig, Drop, Dup, Else, EndIf, EqualVerify, Hash256, If, One, Zero,
};
use Pattern::{Num, Op, Push};

const SIG: Pattern = Push(TxSignature::SIZE);
const PUBKEY: Pattern = Push(PublicKey::SIZE);
const PKH: Pattern = Push(Pkh::SIZE);

const PKH_OUTPUT: [Pattern; 5] = [Op(Dup), Op(Hash256), PKH, Op(EqualVerify), Op(CheckSig)];
const PKH_INPUT: [Pattern; 2] = [SIG, PUBKEY];
const UNEXPIRED_INPUT: [Pattern; 3] = [SIG, PUBKEY, Op(One)];
const RECOVERY_INPUT: [Pattern; 4] = [SIG, PUBKEY, Op(Zero), Op(One)];
const EXPIRED_PKHX_INPUT: [Pattern; 1] = [Op(Zero)];
const EXPIRED_PKHXR_INPUT: [Pattern; 2] = [Op(Zero), Op(Zero)];

const fn pkhx_output(lock: u32) -> [Pattern; 12] {
    [
        Op(If),
        Op(Dup),
        Op(Hash256),
        PKH,
        Op(EqualVerify),
        Op(CheckSig),
        Op(Else),
        Num(lock),
        Op(CheckLockRelVerify),
        Op(Drop),
        Op(One),
        Op(EndIf),
    ]
}

const fn pkhxr_output(expire: u32, recover: u32) -> [Pattern; 23] {
    [
        Op(If),
        Op(Dup),
        Op(Hash256),
        PKH,
        Op(EqualVerify),
        Op(CheckSig),
        Op(Else),
        Op(If),
        Num(recover),
        Op(CheckLockRelVerify),
        Op(Drop),
        Op(Dup),
        Op(Hash256),
        PKH,
        Op(EqualVerify),
        Op(CheckSig),
        Op(Else),
        Num(expire),
        Op(CheckLockRelVerify),
        Op(Drop),
        Op(One),
        Op(EndIf),
        Op(EndIf),
    ]
}

/// Ordered sequence of chunks. Serialized as its wire bytes, so loading runs the chunk decoder.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Script {
    chunks: Vec<ScriptChunk>,
}

impl Script {
    pub fn new(chunks: Vec<ScriptChunk>) -> Self {
        Self { chunks }
    }

    pub fn chunks(&self) -> &[ScriptChunk] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for chunk in &self.chunks {
            chunk.encode(&mut out);
        }
        out
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let mut chunks = Vec::new();
        while !reader.is_empty() {
            chunks.push(ScriptChunk::decode(&mut reader)?);
        }
        Ok(Self { chunks })
    }

    fn matches(&self, template: &[Pattern]) -> bool {
        self.chunks.len() == template.len()
            && self
                .chunks
                .iter()
                .zip(template)
                .all(|(chunk, pattern)| pattern.matches(chunk))
    }

    /// Every chunk is a data push or a small number
    pub fn is_push_only(&self) -> bool {
        self.chunks.iter().all(ScriptChunk::is_push)
    }

    pub fn is_pkh_output(&self) -> bool {
        self.matches(&PKH_OUTPUT)
    }

    pub fn is_pkh_input(&self) -> bool {
        self.matches(&PKH_INPUT)
    }

    pub fn is_pkhx_90d_output(&self) -> bool {
        self.matches(&pkhx_output(LOCK_REL_90D))
    }

    pub fn is_pkhx_1h_output(&self) -> bool {
        self.matches(&pkhx_output(LOCK_REL_1H))
    }

    pub fn is_pkhxr_1h_40m_output(&self) -> bool {
        self.matches(&pkhxr_output(LOCK_REL_1H, LOCK_REL_40M))
    }

    pub fn is_pkhxr_90d_60d_output(&self) -> bool {
        self.matches(&pkhxr_output(LOCK_REL_90D, LOCK_REL_60D))
    }

    pub fn is_pkhx_output(&self) -> bool {
        self.is_pkhx_90d_output() || self.is_pkhx_1h_output()
    }

    pub fn is_pkhxr_output(&self) -> bool {
        self.is_pkhxr_1h_40m_output() || self.is_pkhxr_90d_60d_output()
    }

    /// Spends a PKHX or PKHXR output before it expires
    pub fn is_unexpired_input(&self) -> bool {
        self.matches(&UNEXPIRED_INPUT)
    }

    pub fn is_expired_pkhx_input(&self) -> bool {
        self.matches(&EXPIRED_PKHX_INPUT)
    }

    pub fn is_recovery_pkhxr_input(&self) -> bool {
        self.matches(&RECOVERY_INPUT)
    }

    pub fn is_expired_pkhxr_input(&self) -> bool {
        self.matches(&EXPIRED_PKHXR_INPUT)
    }

    /// Output shapes a mint transaction may pay to
    pub fn is_standard_output(&self) -> bool {
        self.is_pkh_output() || self.is_pkhx_output() || self.is_pkhxr_output()
    }

    /// Pubkey hash paid to by any output of the PKH family
    pub fn pkh(&self) -> Option<Pkh> {
        let index = if self.is_pkh_output() {
            2
        } else if self.is_pkhx_output() || self.is_pkhxr_output() {
            3
        } else {
            return None;
        };
        self.chunks[index].data().and_then(Pkh::from_slice)
    }

    pub fn pkh_output(pkh: &Pkh) -> Self {
        Self::new(vec![
            ScriptChunk::from_opcode(Dup),
            ScriptChunk::from_opcode(Hash256),
            push_pkh(pkh),
            ScriptChunk::from_opcode(EqualVerify),
            ScriptChunk::from_opcode(CheckSig),
        ])
    }

    fn pkhx_output(pkh: &Pkh, lock: u32) -> Self {
        let mut chunks = Self::pkh_output(pkh).chunks;
        chunks.insert(0, ScriptChunk::from_opcode(If));
        chunks.extend([
            ScriptChunk::from_opcode(Else),
            push_num(lock),
            ScriptChunk::from_opcode(CheckLockRelVerify),
            ScriptChunk::from_opcode(Drop),
            ScriptChunk::from_opcode(One),
            ScriptChunk::from_opcode(EndIf),
        ]);
        Self::new(chunks)
    }

    /// Spendable by `pkh` until 90 days pass, then by anyone
    pub fn pkhx_90d_output(pkh: &Pkh) -> Self {
        Self::pkhx_output(pkh, LOCK_REL_90D)
    }

    pub fn pkhx_1h_output(pkh: &Pkh) -> Self {
        Self::pkhx_output(pkh, LOCK_REL_1H)
    }

    fn pkhxr_output(pkh: &Pkh, rpkh: &Pkh, expire: u32, recover: u32) -> Self {
        let mut chunks = Self::pkh_output(pkh).chunks;
        chunks.insert(0, ScriptChunk::from_opcode(If));
        chunks.extend([
            ScriptChunk::from_opcode(Else),
            ScriptChunk::from_opcode(If),
            push_num(recover),
            ScriptChunk::from_opcode(CheckLockRelVerify),
            ScriptChunk::from_opcode(Drop),
        ]);
        chunks.extend(Self::pkh_output(rpkh).chunks);
        chunks.extend([
            ScriptChunk::from_opcode(Else),
            push_num(expire),
            ScriptChunk::from_opcode(CheckLockRelVerify),
            ScriptChunk::from_opcode(Drop),
            ScriptChunk::from_opcode(One),
            ScriptChunk::from_opcode(EndIf),
            ScriptChunk::from_opcode(EndIf),
        ]);
        Self::new(chunks)
    }

    /// Spendable by `pkh`, by `rpkh` after 40 minutes, and by anyone after 1 hour
    pub fn pkhxr_1h_40m_output(pkh: &Pkh, rpkh: &Pkh) -> Self {
        Self::pkhxr_output(pkh, rpkh, LOCK_REL_1H, LOCK_REL_40M)
    }

    pub fn pkhxr_90d_60d_output(pkh: &Pkh, rpkh: &Pkh) -> Self {
        Self::pkhxr_output(pkh, rpkh, LOCK_REL_90D, LOCK_REL_60D)
    }

    pub fn pkh_input(sig: &TxSignature, pubkey: &PublicKey) -> Self {
        Self::new(vec![push(sig.to_bytes()), push(pubkey.to_bytes())])
    }

    pub fn unexpired_input(sig: &TxSignature, pubkey: &PublicKey) -> Self {
        let mut script = Self::pkh_input(sig, pubkey);
        script.chunks.push(ScriptChunk::from_opcode(One));
        script
    }

    pub fn recovery_pkhxr_input(sig: &TxSignature, pubkey: &PublicKey) -> Self {
        let mut script = Self::pkh_input(sig, pubkey);
        script.chunks.extend([
            ScriptChunk::from_opcode(Zero),
            ScriptChunk::from_opcode(One),
        ]);
        script
    }

    pub fn expired_pkhx_input() -> Self {
        Self::new(vec![ScriptChunk::from_opcode(Zero)])
    }

    pub fn expired_pkhxr_input() -> Self {
        Self::new(vec![
            ScriptChunk::from_opcode(Zero),
            ScriptChunk::from_opcode(Zero),
        ])
    }

    /// PKH input with zeroed signature and public key of the final sizes
    pub fn pkh_input_placeholder() -> Self {
        Self::new(vec![
            push(vec![0; TxSignature::SIZE]),
            push(vec![0; PublicKey::SIZE]),
        ])
    }

    pub fn unexpired_input_placeholder() -> Self {
        let mut script = Self::pkh_input_placeholder();
        script.chunks.push(ScriptChunk::from_opcode(One));
        script
    }

    pub fn recovery_pkhxr_input_placeholder() -> Self {
        let mut script = Self::pkh_input_placeholder();
        script.chunks.extend([
            ScriptChunk::from_opcode(Zero),
            ScriptChunk::from_opcode(One),
        ]);
        script
    }

    /// Copy of this input script with the signature and public key chunks replaced
    pub(crate) fn with_signature(&self, sig: &TxSignature, pubkey: &PublicKey) -> Self {
        let mut chunks = self.chunks.clone();
        chunks[0] = push(sig.to_bytes());
        chunks[1] = push(pubkey.to_bytes());
        Self::new(chunks)
    }
}

/// Direct push of a payload known to be at most 0x4b bytes
fn push(data: Vec<u8>) -> ScriptChunk {
    debug_assert!(data.len() <= MAX_DIRECT_PUSH);
    if data.is_empty() {
        return ScriptChunk::from_opcode(Zero);
    }
    ScriptChunk {
        opcode: data.len() as u8,
        data: Some(data),
    }
}

fn push_pkh(pkh: &Pkh) -> ScriptChunk {
    push(pkh.as_bytes().to_vec())
}

fn push_num(n: u32) -> ScriptChunk {
    push(ScriptNum::from(i64::from(n)).to_bytes())
}

impl std::fmt::Display for Script {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, chunk) in self.chunks.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{chunk}")?;
        }
        Ok(())
    }
}

impl TryFrom<Vec<u8>> for Script {
    type Error = CoinError;

    fn try_from(bytes: Vec<u8>) -> Result<Self> {
        Self::from_bytes(&bytes)
    }
}

impl From<Script> for Vec<u8> {
    fn from(script: Script) -> Self {
        script.to_bytes()
    }
}

impl std::str::FromStr for Script {
    type Err = CoinError;

    fn from_str(s: &str) -> Result<Self> {
        s.split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<_>>>()
            .map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{KeyPair, SIGHASH_ALL};
    use crate::sha256::Hash;

    fn pkh() -> Pkh {
        KeyPair::new_random().public.pkh()
    }

    #[test]
    fn pkh_output_text_form() {
        let pkh = Pkh::from_slice(&[0xab; 32]).unwrap();
        let script = Script::pkh_output(&pkh);
        assert_eq!(
            script.to_string(),
            format!("DUP HASH256 0x{} EQUALVERIFY CHECKSIG", "ab".repeat(32))
        );
        assert_eq!(script.to_string().parse::<Script>().unwrap(), script);
        assert_eq!(script.pkh(), Some(pkh));
    }

    #[test]
    fn serializes_as_wire_bytes() {
        let script = Script::pkh_output(&pkh());
        let mut buf = Vec::new();
        ciborium::ser::into_writer(&script, &mut buf).unwrap();
        let loaded: Script = ciborium::de::from_reader(buf.as_slice()).unwrap();
        assert_eq!(loaded, script);

        // a 1 byte push swallows the first pkh byte, the rest decodes as unknown opcodes
        let mut bytes = vec![0x76, 0xaa, 0x01];
        bytes.extend([0xab; 32]);
        bytes.extend([0x88, 0xac]);
        let mut buf = Vec::new();
        ciborium::ser::into_writer(&bytes, &mut buf).unwrap();
        assert!(ciborium::de::from_reader::<Script, _>(buf.as_slice()).is_err());
    }

    #[test]
    fn pkh_output_bytes() {
        let pkh = Pkh::from_slice(&[0x11; 32]).unwrap();
        let bytes = Script::pkh_output(&pkh).to_bytes();
        assert_eq!(bytes.len(), 37);
        assert_eq!(&bytes[..3], &[0x76, 0xaa, 0x20]);
        assert_eq!(&bytes[35..], &[0x88, 0xac]);
        assert_eq!(Script::from_bytes(&bytes).unwrap(), Script::pkh_output(&pkh));
    }

    #[test]
    fn pushdata2_round_trip() {
        let chunk = ScriptChunk::from_data(vec![7; 300]).unwrap();
        assert_eq!(chunk.opcode(), Opcode::PushData2 as u8);
        let script = Script::new(vec![chunk]);
        let bytes = script.to_bytes();
        assert_eq!(&bytes[..3], &[0x4d, 0x01, 0x2c]);
        assert_eq!(Script::from_bytes(&bytes).unwrap(), script);
        assert!(ScriptChunk::from_data(vec![0; MAX_PUSH_SIZE + 1]).is_err());
    }

    #[test]
    fn rejects_malformed_bytes() {
        // truncated direct push
        assert!(Script::from_bytes(&[0x05, 1, 2]).is_err());
        // PUSHDATA2 for a payload that fits a direct push
        assert_eq!(
            Script::from_bytes(&[0x4d, 0x00, 0x01, 0xff]),
            Err(CoinError::NonMinimalEncoding("push data"))
        );
        // unassigned opcode
        assert!(Script::from_bytes(&[0xfe]).is_err());
    }

    #[test]
    fn recognizes_time_locked_outputs() {
        let (a, b) = (pkh(), pkh());
        let pkhx_90d = Script::pkhx_90d_output(&a);
        let pkhx_1h = Script::pkhx_1h_output(&a);
        let pkhxr_1h = Script::pkhxr_1h_40m_output(&a, &b);
        let pkhxr_90d = Script::pkhxr_90d_60d_output(&a, &b);

        assert!(pkhx_90d.is_pkhx_90d_output() && !pkhx_90d.is_pkhx_1h_output());
        assert!(pkhx_1h.is_pkhx_1h_output() && !pkhx_1h.is_pkhx_90d_output());
        assert!(pkhxr_1h.is_pkhxr_1h_40m_output() && !pkhxr_1h.is_pkhxr_90d_60d_output());
        assert!(pkhxr_90d.is_pkhxr_90d_60d_output());
        assert_eq!(pkhxr_90d.len(), 23);
        for script in [&pkhx_90d, &pkhx_1h, &pkhxr_1h, &pkhxr_90d] {
            assert!(script.is_standard_output());
            assert!(!script.is_pkh_output());
            assert_eq!(script.pkh(), Some(a));
        }
        assert_eq!(
            pkhx_90d.to_string().split(' ').nth(7),
            Some("0x32a0"),
            "90 day lock is pushed as a script number"
        );
    }

    #[test]
    fn recognizes_inputs() {
        let keys = KeyPair::new_random();
        let sig = TxSignature::sign(&Hash::digest(b"x"), &keys.private, SIGHASH_ALL);

        assert!(Script::pkh_input(&sig, &keys.public).is_pkh_input());
        assert!(Script::pkh_input_placeholder().is_pkh_input());
        assert!(Script::unexpired_input(&sig, &keys.public).is_unexpired_input());
        assert!(Script::unexpired_input_placeholder().is_unexpired_input());
        assert!(Script::recovery_pkhxr_input_placeholder().is_recovery_pkhxr_input());
        assert!(Script::recovery_pkhxr_input(&sig, &keys.public).is_recovery_pkhxr_input());
        assert!(Script::expired_pkhx_input().is_expired_pkhx_input());
        assert!(Script::expired_pkhxr_input().is_expired_pkhxr_input());
        assert!(!Script::pkh_input_placeholder().is_unexpired_input());
    }

    #[test]
    fn placeholder_has_final_size() {
        let keys = KeyPair::new_random();
        let sig = TxSignature::sign(&Hash::digest(b"x"), &keys.private, SIGHASH_ALL);
        let placeholder = Script::pkh_input_placeholder();
        let signed = placeholder.with_signature(&sig, &keys.public);
        assert_eq!(signed, Script::pkh_input(&sig, &keys.public));
        assert_eq!(placeholder.to_bytes().len(), signed.to_bytes().len());
    }

    #[test]
    fn push_only() {
        let script: Script = "0x00ff 0 1 16 1NEGATE".parse().unwrap();
        assert!(script.is_push_only());
        let script: Script = "0x00ff DUP".parse().unwrap();
        assert!(!script.is_push_only());
    }

    #[test]
    fn text_form_rejects_unknown_tokens() {
        assert!("DUP FOO".parse::<Script>().is_err());
        assert!("0xzz".parse::<Script>().is_err());
        assert_eq!("".parse::<Script>().unwrap(), Script::default());
    }
}
