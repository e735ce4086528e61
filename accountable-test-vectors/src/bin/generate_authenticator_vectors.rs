//! Regenerate the authenticator golden vectors from the reference key
//! material and print the JSON to stdout.
//!
//! The chameleon hash output for `("abc", 0x0102…0708)` and the collision
//! randomness are fixed by the scheme algebra; everything else here is
//! regression-pinned output of the current implementation. Redirect into
//! `test_vectors/authenticator_test_vectors.json` after an intentional
//! wire-format change.

use accountable_assertions::{Authenticator, Context, SecretKey};
use serde_json::json;

const SECRET_KEY_HEX: &str = "b21977c8ca1cbb55f0a3effd9966e3d5c9588688fa02bf7a0d2af7b6366f1e8f";
const CONTEXT_HEX: &str = "4104ff175fa917ab";
const STATEMENT_1: &[u8] = b"abc";
const STATEMENT_2: &[u8] = b"123";

fn decode_fixed<const N: usize>(hex_str: &str) -> [u8; N] {
    let bytes = hex::decode(hex_str).expect("vector hex is well-formed");
    bytes
        .as_slice()
        .try_into()
        .expect("vector hex has the declared length")
}

fn main() {
    let secret_key: SecretKey = decode_fixed(SECRET_KEY_HEX);
    let context: Context = decode_fixed(CONTEXT_HEX);

    let authenticator =
        Authenticator::from_secret_key(&secret_key).expect("reference secret key is valid");
    let params = authenticator.public_params();
    let token1 = authenticator
        .authenticate(&context, STATEMENT_1)
        .expect("authentication with the reference key succeeds");
    let token2 = authenticator
        .authenticate(&context, STATEMENT_2)
        .expect("authentication with the reference key succeeds");

    let document = json!({
        "algorithm": "AccountableAssertions",
        "description": "Golden vectors for the tree-walking authenticator: fixed key material, the derived public parameters, and two verifying tokens for the same context whose combination extracts the secret key.",
        "parameters": {
            "ct_len": accountable_assertions::CT_LEN,
            "depth": accountable_assertions::DEPTH,
            "token_len": accountable_assertions::TOKEN_LEN,
        },
        "vectors": [
            {
                "test_name": "fixed_context_double_sign",
                "secret_key": SECRET_KEY_HEX,
                "public_key": hex::encode(params.public_key),
                "root_digest": hex::encode(params.root_digest),
                "public_params": hex::encode(params.to_bytes()),
                "context": CONTEXT_HEX,
                "statement1": hex::encode(STATEMENT_1),
                "statement2": hex::encode(STATEMENT_2),
                "token1": hex::encode(token1.to_bytes()),
                "token2": hex::encode(token2.to_bytes()),
            }
        ],
    });

    println!(
        "{}",
        serde_json::to_string_pretty(&document).expect("vector document serialises")
    );
}
