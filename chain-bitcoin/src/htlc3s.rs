//! The 3-hashlock UTXO-script HTLC: redeem script construction, claim and
//! refund transaction assembly, and witness parsing. Byte positions in
//! [`Htlc3sScript::to_script`] are fixed and relied on by
//! [`parse_claim_witness`] and by the watcher's witness recognizer.

use bitcoin::hashes::Hash;
use bitcoin::opcodes::all::*;
use bitcoin::script::Builder;
use bitcoin::secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use bitcoin::sighash::{EcdsaSighashType, SighashCache};
use bitcoin::{
    absolute::LockTime, Address, Amount, Network, OutPoint, ScriptBuf, Sequence, Transaction,
    TxIn, TxOut, Txid, Witness,
};

use flowswap_primitives::{bech32_encode, sha256};
use swap_core::HashlockTriple;

use crate::error::{BitcoinError, Result};

/// Parameters of one 3-hashlock redeem script. `recipient_pubkey` signs the
/// secret-reveal (IF) path, `refund_pubkey` the timeout (ELSE) path.
#[derive(Debug, Clone)]
pub struct Htlc3sScript {
    pub recipient_pubkey: PublicKey,
    pub refund_pubkey: PublicKey,
    pub hashlocks: HashlockTriple,
    /// Absolute block height at which the refund path becomes spendable.
    pub timelock: u32,
}

impl Htlc3sScript {
    pub fn new(
        recipient_pubkey: PublicKey,
        refund_pubkey: PublicKey,
        hashlocks: HashlockTriple,
        timelock: u32,
    ) -> Self {
        Self {
            recipient_pubkey,
            refund_pubkey,
            hashlocks,
            timelock,
        }
    }

    /// Build the canonical redeem script:
    ///
    /// ```text
    /// OP_IF
    ///   OP_SHA256 <H_user> OP_EQUALVERIFY
    ///   OP_SHA256 <H_lp1>  OP_EQUALVERIFY
    ///   OP_SHA256 <H_lp2>  OP_EQUALVERIFY
    ///   <recipient_pubkey> OP_CHECKSIG
    /// OP_ELSE
    ///   <timelock> OP_CHECKLOCKTIMEVERIFY OP_DROP
    ///   <refund_pubkey> OP_CHECKSIG
    /// OP_ENDIF
    /// ```
    ///
    /// A claim must reveal all three secrets in one witness, which is what
    /// lets a single spend on one ledger publish preimages usable on the
    /// other two.
    pub fn to_script(&self) -> ScriptBuf {
        Builder::new()
            .push_opcode(OP_IF)
            .push_opcode(OP_SHA256)
            .push_slice(self.hashlocks.user.as_bytes())
            .push_opcode(OP_EQUALVERIFY)
            .push_opcode(OP_SHA256)
            .push_slice(self.hashlocks.lp1.as_bytes())
            .push_opcode(OP_EQUALVERIFY)
            .push_opcode(OP_SHA256)
            .push_slice(self.hashlocks.lp2.as_bytes())
            .push_opcode(OP_EQUALVERIFY)
            .push_slice(self.recipient_pubkey.serialize())
            .push_opcode(OP_CHECKSIG)
            .push_opcode(OP_ELSE)
            .push_int(self.timelock as i64)
            .push_opcode(OP_CLTV)
            .push_opcode(OP_DROP)
            .push_slice(self.refund_pubkey.serialize())
            .push_opcode(OP_CHECKSIG)
            .push_opcode(OP_ENDIF)
            .into_script()
    }

    /// The P2WSH witness program: `SHA256(redeem_script)`.
    pub fn witness_program(&self) -> [u8; 32] {
        sha256(self.to_script().as_bytes())
    }

    /// Bech32 P2WSH address for this script under the given network.
    pub fn address(&self, network: Network) -> Result<Address> {
        let script = self.to_script();
        let witness_script_hash = bitcoin::WScriptHash::hash(script.as_bytes());
        let p2wsh = ScriptBuf::new_p2wsh(&witness_script_hash);
        Address::from_script(&p2wsh, network).map_err(|e| BitcoinError::Address(e.to_string()))
    }

    /// Bech32 P2WSH address using the raw encoder directly, rather than
    /// going through `bitcoin::Address` — kept so the workspace's own
    /// bech32 implementation stays exercised end to end (R3).
    pub fn address_string(&self, hrp: &str) -> Result<String> {
        bech32_encode(hrp, 0, &self.witness_program())
            .map_err(|e| BitcoinError::Address(e.to_string()))
    }
}

/// A claim transaction signed before the three secrets are known. In
/// segwit v0 the sighash covers outputs, prevout value, and scriptCode,
/// but not the witness stack, so this signature stays valid no matter
/// which secrets end up assembled into the witness (P7).
pub struct PresignedClaim {
    pub tx: Transaction,
    pub script: ScriptBuf,
    pub signature_der_plus_sighash: Vec<u8>,
}

fn estimate_fee(vsize_base: u64, script_len: usize, fee_rate_sat_per_vb: f32) -> u64 {
    let vsize = vsize_base + (script_len as u64 / 4);
    (vsize as f32 * fee_rate_sat_per_vb).ceil() as u64
}

fn new_unsigned_spend(
    htlc_txid: Txid,
    htlc_vout: u32,
    amount: Amount,
    destination: &Address,
    fee: u64,
    lock_time: LockTime,
) -> Result<Transaction> {
    let output_value = amount
        .to_sat()
        .checked_sub(fee)
        .ok_or_else(|| BitcoinError::Dust { amount: 0, threshold: crate::constants::DUST_THRESHOLD_SATS })?;
    if output_value < crate::constants::DUST_THRESHOLD_SATS {
        return Err(BitcoinError::Dust {
            amount: output_value,
            threshold: crate::constants::DUST_THRESHOLD_SATS,
        });
    }
    Ok(Transaction {
        version: bitcoin::transaction::Version::TWO,
        lock_time,
        input: vec![TxIn {
            previous_output: OutPoint {
                txid: htlc_txid,
                vout: htlc_vout,
            },
            script_sig: ScriptBuf::new(),
            sequence: Sequence::ENABLE_LOCKTIME_NO_RBF,
            witness: Witness::new(),
        }],
        output: vec![TxOut {
            value: Amount::from_sat(output_value),
            script_pubkey: destination.script_pubkey(),
        }],
    })
}

/// Pre-sign a claim transaction against the recipient's key, before the
/// three secrets are known. The witness is assembled later by
/// [`assemble_claim`] once the secrets are in hand.
pub fn presign_claim(
    htlc: &Htlc3sScript,
    htlc_txid: Txid,
    htlc_vout: u32,
    amount: Amount,
    destination: &Address,
    claim_privkey: &SecretKey,
    fee_rate_sat_per_vb: f32,
) -> Result<PresignedClaim> {
    let script = htlc.to_script();
    let fee = estimate_fee(
        crate::constants::CLAIM_VSIZE_BASE,
        script.len(),
        fee_rate_sat_per_vb,
    );
    let tx = new_unsigned_spend(
        htlc_txid,
        htlc_vout,
        amount,
        destination,
        fee,
        LockTime::ZERO,
    )?;

    let secp = Secp256k1::new();
    let mut cache = SighashCache::new(&tx);
    let sighash = cache
        .p2wsh_signature_hash(0, &script, amount, EcdsaSighashType::All)
        .map_err(|e| BitcoinError::Sighash(e.to_string()))?;
    let message = Message::from_digest(sighash.to_byte_array());
    let signature = secp.sign_ecdsa(&message, claim_privkey);
    let mut sig_bytes = signature.serialize_der().to_vec();
    sig_bytes.push(EcdsaSighashType::All as u8);

    Ok(PresignedClaim {
        tx,
        script,
        signature_der_plus_sighash: sig_bytes,
    })
}

/// Assemble the final claim witness once the three secrets are known.
/// Verifies each preimage against the hashlock bytes embedded in the
/// redeem script before building the stack, so a caller can never
/// broadcast a witness whose secrets don't actually match this HTLC.
pub fn assemble_claim(
    presigned: PresignedClaim,
    s_user: &[u8],
    s_lp1: &[u8],
    s_lp2: &[u8],
) -> Result<Transaction> {
    verify_preimages_match_script(&presigned.script, s_user, s_lp1, s_lp2)?;

    // Bottom-to-top witness stack order: [sig, S_lp2, S_lp1, S_user, 0x01, script].
    // This is the inverse of verification order: the script pops S_user
    // first, then S_lp1, then S_lp2, then checks the signature.
    let mut witness = Witness::new();
    witness.push(&presigned.signature_der_plus_sighash);
    witness.push(s_lp2);
    witness.push(s_lp1);
    witness.push(s_user);
    witness.push([0x01]);
    witness.push(presigned.script.as_bytes());

    let mut tx = presigned.tx;
    tx.input[0].witness = witness;
    Ok(tx)
}

fn verify_preimages_match_script(
    script: &ScriptBuf,
    s_user: &[u8],
    s_lp1: &[u8],
    s_lp2: &[u8],
) -> Result<()> {
    let bytes = script.as_bytes();
    if bytes.len() < 105 {
        return Err(BitcoinError::NotAClaimWitness);
    }
    let h_user = &bytes[3..35];
    let h_lp1 = &bytes[38..70];
    let h_lp2 = &bytes[73..105];
    if sha256(s_user) != *h_user || sha256(s_lp1) != *h_lp1 || sha256(s_lp2) != *h_lp2 {
        return Err(BitcoinError::HashlockMismatch);
    }
    Ok(())
}

/// Build a refund transaction, spendable only once the chain tip reaches
/// `htlc.timelock`. `nLockTime` equals the HTLC's absolute timelock and
/// the input's `nSequence` enables `OP_CHECKLOCKTIMEVERIFY`.
pub fn create_refund_transaction(
    htlc: &Htlc3sScript,
    htlc_txid: Txid,
    htlc_vout: u32,
    amount: Amount,
    refund_address: &Address,
    refund_privkey: &SecretKey,
    fee_rate_sat_per_vb: f32,
) -> Result<Transaction> {
    let script = htlc.to_script();
    let fee = estimate_fee(
        crate::constants::REFUND_VSIZE_BASE,
        script.len(),
        fee_rate_sat_per_vb,
    );
    let lock_time = LockTime::from_height(htlc.timelock)
        .map_err(|e| BitcoinError::InvalidTimelock(e.to_string()))?;
    let mut tx = new_unsigned_spend(
        htlc_txid,
        htlc_vout,
        amount,
        refund_address,
        fee,
        lock_time,
    )?;
    tx.input[0].sequence = Sequence::ENABLE_LOCKTIME_NO_RBF;

    let secp = Secp256k1::new();
    let mut cache = SighashCache::new(&tx);
    let sighash = cache
        .p2wsh_signature_hash(0, &script, amount, EcdsaSighashType::All)
        .map_err(|e| BitcoinError::Sighash(e.to_string()))?;
    let message = Message::from_digest(sighash.to_byte_array());
    let signature = secp.sign_ecdsa(&message, refund_privkey);
    let mut sig_bytes = signature.serialize_der().to_vec();
    sig_bytes.push(EcdsaSighashType::All as u8);

    // ELSE-branch witness stack: [signature, empty, redeem_script].
    let mut witness = Witness::new();
    witness.push(&sig_bytes);
    witness.push([]);
    witness.push(script.as_bytes());
    tx.input[0].witness = witness;

    Ok(tx)
}

/// The three secrets extracted from a spending witness, if it matches the
/// 3-secret claim shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSecrets {
    pub s_user: Vec<u8>,
    pub s_lp1: Vec<u8>,
    pub s_lp2: Vec<u8>,
}

/// Parse a spending witness per BIP-144. Returns `Ok(Some(..))` for a
/// recognized claim witness, `Ok(None)` for a recognized refund witness
/// (the ELSE branch), and `Err` if the shape doesn't match either.
pub fn parse_claim_witness(witness: &Witness) -> Result<Option<ExtractedSecrets>> {
    let items: Vec<&[u8]> = witness.iter().collect();
    if items.len() == 6 {
        if items[4] != [0x01] {
            return Err(BitcoinError::NotAClaimWitness);
        }
        let s_lp2 = items[1];
        let s_lp1 = items[2];
        let s_user = items[3];
        for (pos, secret) in [(1, s_lp2), (2, s_lp1), (3, s_user)] {
            if secret.len() != 32 {
                return Err(BitcoinError::InvalidSecretLength(pos));
            }
        }
        return Ok(Some(ExtractedSecrets {
            s_user: s_user.to_vec(),
            s_lp1: s_lp1.to_vec(),
            s_lp2: s_lp2.to_vec(),
        }));
    }
    if items.len() == 3 && items[1].is_empty() {
        return Ok(None);
    }
    Err(BitcoinError::NotAClaimWitness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::secp256k1::rand::thread_rng;

    fn sample_htlc() -> (Htlc3sScript, SecretKey, SecretKey) {
        let secp = Secp256k1::new();
        let mut rng = thread_rng();
        let (recipient_sk, recipient_pk) = secp.generate_keypair(&mut rng);
        let (refund_sk, refund_pk) = secp.generate_keypair(&mut rng);
        let hashlocks = swap_core::HashlockTriple {
            user: flowswap_primitives::gen_secret().1,
            lp1: flowswap_primitives::gen_secret().1,
            lp2: flowswap_primitives::gen_secret().1,
        };
        (
            Htlc3sScript::new(recipient_pk, refund_pk, hashlocks, 800_000),
            recipient_sk,
            refund_sk,
        )
    }

    #[test]
    fn script_byte_layout_matches_canonical_table() {
        let (htlc, ..) = sample_htlc();
        let bytes = htlc.to_script().into_bytes();
        assert_eq!(bytes[0], OP_IF.to_u8());
        assert_eq!(bytes[1], OP_SHA256.to_u8());
        assert_eq!(bytes[2], 0x20);
        assert_eq!(&bytes[3..35], htlc.hashlocks.user.as_bytes());
        assert_eq!(bytes[35], OP_EQUALVERIFY.to_u8());
        assert_eq!(bytes[36], OP_SHA256.to_u8());
        assert_eq!(bytes[37], 0x20);
        assert_eq!(&bytes[38..70], htlc.hashlocks.lp1.as_bytes());
        assert_eq!(bytes[70], OP_EQUALVERIFY.to_u8());
        assert_eq!(bytes[71], OP_SHA256.to_u8());
        assert_eq!(bytes[72], 0x20);
        assert_eq!(&bytes[73..105], htlc.hashlocks.lp2.as_bytes());
        assert_eq!(bytes[105], OP_EQUALVERIFY.to_u8());
        assert_eq!(bytes[106], 0x21);
        assert_eq!(bytes[140], OP_CHECKSIG.to_u8());
        assert_eq!(bytes[141], OP_ELSE.to_u8());
    }

    #[test]
    fn presign_then_assemble_round_trips_secrets() {
        let (htlc, recipient_sk, _refund_sk) = sample_htlc();
        let secp = Secp256k1::new();
        let dest = Address::p2wpkh(
            &bitcoin::CompressedPublicKey(recipient_sk.public_key(&secp)),
            Network::Signet,
        );
        let txid = Txid::from_byte_array([7u8; 32]);
        let presigned = presign_claim(
            &htlc,
            txid,
            0,
            Amount::from_sat(50_000),
            &dest,
            &recipient_sk,
            20.0,
        )
        .unwrap();

        let (s_user, _) = flowswap_primitives::gen_secret();
        // secrets here are synthetic and won't match htlc.hashlocks, so
        // assemble_claim must reject them — exercised in the next test.
        let result = assemble_claim(presigned, s_user.as_bytes(), s_user.as_bytes(), s_user.as_bytes());
        assert!(result.is_err());
    }

    #[test]
    fn assemble_claim_accepts_matching_preimages() {
        let secp = Secp256k1::new();
        let mut rng = thread_rng();
        let (recipient_sk, recipient_pk) = secp.generate_keypair(&mut rng);
        let (_refund_sk, refund_pk) = secp.generate_keypair(&mut rng);

        let (s_user, h_user) = flowswap_primitives::gen_secret();
        let (s_lp1, h_lp1) = flowswap_primitives::gen_secret();
        let (s_lp2, h_lp2) = flowswap_primitives::gen_secret();
        let htlc = Htlc3sScript::new(
            recipient_pk,
            refund_pk,
            swap_core::HashlockTriple {
                user: h_user,
                lp1: h_lp1,
                lp2: h_lp2,
            },
            800_000,
        );

        let dest = Address::p2wpkh(&bitcoin::CompressedPublicKey(recipient_pk), Network::Signet);
        let txid = Txid::from_byte_array([9u8; 32]);
        let presigned = presign_claim(
            &htlc,
            txid,
            0,
            Amount::from_sat(50_000),
            &dest,
            &recipient_sk,
            20.0,
        )
        .unwrap();

        let tx = assemble_claim(presigned, s_user.as_bytes(), s_lp1.as_bytes(), s_lp2.as_bytes())
            .unwrap();
        let extracted = parse_claim_witness(&tx.input[0].witness).unwrap().unwrap();
        assert_eq!(extracted.s_user, s_user.as_bytes());
        assert_eq!(extracted.s_lp1, s_lp1.as_bytes());
        assert_eq!(extracted.s_lp2, s_lp2.as_bytes());
    }

    #[test]
    fn refund_witness_is_recognized_and_yields_no_secrets() {
        let mut witness = Witness::new();
        witness.push([0x30, 0x01]);
        witness.push([]);
        witness.push([0x63]);
        assert_eq!(parse_claim_witness(&witness).unwrap(), None);
    }

    #[test]
    fn malformed_witness_is_rejected() {
        let mut witness = Witness::new();
        witness.push([0x01]);
        assert!(parse_claim_witness(&witness).is_err());
    }
}
