//! BIP-173/350 bech32 and bech32m encoding for segwit addresses.
//!
//! Witness version 0 uses the original bech32 checksum constant; version 1
//! and above (taproot) use the BIP-350 bech32m constant. The encoder picks
//! the right one from the witness version so callers never have to think
//! about it.

use thiserror::Error;

const CHARSET: &[u8] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";
const BECH32_CONST: u32 = 1;
const BECH32M_CONST: u32 = 0x2bc830a3;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Bech32Error {
    #[error("missing separator '1' in bech32 string")]
    MissingSeparator,
    #[error("invalid character in bech32 string")]
    InvalidChar,
    #[error("checksum mismatch")]
    InvalidChecksum,
    #[error("empty human-readable part")]
    EmptyHrp,
    #[error("invalid witness version {0}")]
    InvalidWitnessVersion(u8),
    #[error("invalid witness program length {0}")]
    InvalidProgramLength(usize),
}

fn checksum_const(witness_version: u8) -> u32 {
    if witness_version == 0 {
        BECH32_CONST
    } else {
        BECH32M_CONST
    }
}

fn polymod(values: &[u8]) -> u32 {
    const GEN: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];
    let mut chk: u32 = 1;
    for &v in values {
        let b = chk >> 25;
        chk = ((chk & 0x1ffffff) << 5) ^ (v as u32);
        for (i, g) in GEN.iter().enumerate() {
            if (b >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let mut v: Vec<u8> = hrp.bytes().map(|b| b >> 5).collect();
    v.push(0);
    v.extend(hrp.bytes().map(|b| b & 31));
    v
}

fn create_checksum(hrp: &str, data: &[u8], spec_const: u32) -> [u8; 6] {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
    let poly = polymod(&values) ^ spec_const;
    let mut checksum = [0u8; 6];
    for (i, c) in checksum.iter_mut().enumerate() {
        *c = ((poly >> (5 * (5 - i))) & 31) as u8;
    }
    checksum
}

fn verify_checksum(hrp: &str, data: &[u8], spec_const: u32) -> bool {
    let mut values = hrp_expand(hrp);
    values.extend_from_slice(data);
    polymod(&values) == spec_const
}

/// Regroup a byte sequence from `frombits`-bit groups to `tobits`-bit
/// groups, padding the final group with zero bits when `pad` is set.
fn convert_bits(data: &[u8], frombits: u32, tobits: u32, pad: bool) -> Option<Vec<u8>> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let maxv: u32 = (1 << tobits) - 1;
    let mut ret = Vec::new();
    for &value in data {
        if (value as u32) >> frombits != 0 {
            return None;
        }
        acc = (acc << frombits) | value as u32;
        bits += frombits;
        while bits >= tobits {
            bits -= tobits;
            ret.push(((acc >> bits) & maxv) as u8);
        }
    }
    if pad {
        if bits > 0 {
            ret.push(((acc << (tobits - bits)) & maxv) as u8);
        }
    } else if bits >= frombits || ((acc << (tobits - bits)) & maxv) != 0 {
        return None;
    }
    Some(ret)
}

/// Encode a segwit witness program as a bech32/bech32m address.
///
/// `hrp` is the ledger's human-readable prefix (`"bc"` mainnet, `"tb"`
/// testnet/signet). `witness_version` selects the checksum constant.
pub fn bech32_encode(hrp: &str, witness_version: u8, witness_program: &[u8]) -> Result<String, Bech32Error> {
    if hrp.is_empty() {
        return Err(Bech32Error::EmptyHrp);
    }
    if witness_version > 16 {
        return Err(Bech32Error::InvalidWitnessVersion(witness_version));
    }
    if witness_program.len() < 2 || witness_program.len() > 40 {
        return Err(Bech32Error::InvalidProgramLength(witness_program.len()));
    }

    let mut data = vec![witness_version];
    data.extend(convert_bits(witness_program, 8, 5, true).expect("8->5 bit conversion cannot fail"));

    let spec_const = checksum_const(witness_version);
    let checksum = create_checksum(hrp, &data, spec_const);

    let mut out = String::with_capacity(hrp.len() + 1 + data.len() + checksum.len());
    out.push_str(hrp);
    out.push('1');
    for &d in data.iter().chain(checksum.iter()) {
        out.push(CHARSET[d as usize] as char);
    }
    Ok(out)
}

/// Decode a bech32/bech32m segwit address, returning `(witness_version,
/// witness_program)`.
pub fn bech32_decode(address: &str) -> Result<(u8, Vec<u8>), Bech32Error> {
    let lower = address.to_lowercase();
    let pos = lower.rfind('1').ok_or(Bech32Error::MissingSeparator)?;
    let (hrp, data_part) = lower.split_at(pos);
    let data_part = &data_part[1..];
    if hrp.is_empty() || data_part.len() < 6 {
        return Err(Bech32Error::EmptyHrp);
    }

    let mut data = Vec::with_capacity(data_part.len());
    for c in data_part.chars() {
        let idx = CHARSET
            .iter()
            .position(|&x| x as char == c)
            .ok_or(Bech32Error::InvalidChar)?;
        data.push(idx as u8);
    }

    let (payload, _checksum) = data.split_at(data.len() - 6);
    let witness_version = payload[0];
    let spec_const = checksum_const(witness_version);
    if !verify_checksum(hrp, &data, spec_const) {
        return Err(Bech32Error::InvalidChecksum);
    }

    let program = convert_bits(&payload[1..], 5, 8, false).ok_or(Bech32Error::InvalidChar)?;
    if program.len() < 2 || program.len() > 40 {
        return Err(Bech32Error::InvalidProgramLength(program.len()));
    }

    Ok((witness_version, program))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_witness_v0_p2wsh() {
        let program = [7u8; 32];
        let addr = bech32_encode("tb", 0, &program).unwrap();
        assert!(addr.starts_with("tb1"));
        let (version, decoded) = bech32_decode(&addr).unwrap();
        assert_eq!(version, 0);
        assert_eq!(decoded, program.to_vec());
    }

    #[test]
    fn round_trip_witness_v1_taproot() {
        let program = [0xabu8; 32];
        let addr = bech32_encode("bc", 1, &program).unwrap();
        let (version, decoded) = bech32_decode(&addr).unwrap();
        assert_eq!(version, 1);
        assert_eq!(decoded, program.to_vec());
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let program = [1u8; 32];
        let mut addr = bech32_encode("tb", 0, &program).unwrap();
        let last = addr.pop().unwrap();
        let replacement = if last == 'q' { 'p' } else { 'q' };
        addr.push(replacement);
        assert_eq!(bech32_decode(&addr), Err(Bech32Error::InvalidChecksum));
    }

    #[test]
    fn every_32_byte_program_round_trips() {
        for seed in 0u8..8 {
            let program: [u8; 32] = std::array::from_fn(|i| seed.wrapping_mul(31).wrapping_add(i as u8));
            let addr = bech32_encode("tb", 0, &program).unwrap();
            assert_eq!(bech32_decode(&addr).unwrap(), (0, program.to_vec()));
        }
    }
}
