use argon2_core::derivation::argon2::encoding::{b64len, decode, encode, numlen};
use argon2_core::derivation::argon2::{
    Context, EncodedHash, Error, Params, Variant, Version, encoded_len, hash, hash_encoded, verify,
    verify_ctx,
};
use zeroize::Zeroizing;

const ARGON2ID_ENCODED: &str =
    "$argon2id$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc";

const ARGON2I_ENCODED: &str =
    "$argon2i$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$wWKIMhR9lyDFvRz9YTZweHKfbftvj+qf+YFY4NeBbtA";

#[test]
fn hash_encoded_matches_reference_string() {
    let params = Params::new(65536, 2, 1, 32);

    assert_eq!(
        hash_encoded(b"password", b"somesalt", &params, Variant::Argon2id).unwrap(),
        ARGON2ID_ENCODED
    );
    assert_eq!(
        hash_encoded(b"password", b"somesalt", &params, Variant::Argon2i).unwrap(),
        ARGON2I_ENCODED
    );
}

#[test]
fn verify_reference_strings() {
    assert_eq!(verify(ARGON2ID_ENCODED, b"password", Variant::Argon2id), Ok(()));
    assert_eq!(verify(ARGON2I_ENCODED, b"password", Variant::Argon2i), Ok(()));
}

#[test]
fn verify_round_trip() {
    let params = Params::new(64, 2, 2, 16);
    for variant in [Variant::Argon2d, Variant::Argon2i, Variant::Argon2id] {
        let encoded = hash_encoded(b"correct horse", b"battery staple", &params, variant).unwrap();

        assert_eq!(verify(&encoded, b"correct horse", variant), Ok(()));
        assert_eq!(
            verify(&encoded, b"wrong horse", variant),
            Err(Error::VerifyMismatch)
        );
    }
}

#[test]
fn verify_rejects_other_variant() {
    assert_eq!(
        verify(ARGON2ID_ENCODED, b"password", Variant::Argon2i),
        Err(Error::DecodingFail)
    );
    assert_eq!(
        verify(ARGON2I_ENCODED, b"password", Variant::Argon2id),
        Err(Error::DecodingFail)
    );
}

#[test]
fn verify_ctx_compares_in_place() {
    let expected = hash(
        b"password",
        b"saltsalt",
        &Params::new(32, 1, 1, 32),
        Variant::Argon2d,
    )
    .unwrap();

    let mut out = [0u8; 32];
    let mut pwd = *b"password";
    let mut context = Context::new(&mut out, &mut pwd, b"saltsalt").with_costs(1, 32, 1);
    assert_eq!(verify_ctx(&mut context, &expected, Variant::Argon2d), Ok(()));

    let mut out = [0u8; 32];
    let mut pwd = *b"passwore";
    let mut context = Context::new(&mut out, &mut pwd, b"saltsalt").with_costs(1, 32, 1);
    assert_eq!(
        verify_ctx(&mut context, &expected, Variant::Argon2d),
        Err(Error::VerifyMismatch)
    );
}

#[test]
fn missing_version_decodes_as_0x10() {
    let params = Params::new(32, 2, 1, 16).with_version(Version::V0x10);
    let encoded = hash_encoded(b"password", b"saltsalt", &params, Variant::Argon2i).unwrap();
    assert!(encoded.starts_with("$argon2i$v=16$"));

    let legacy = encoded.replace("$v=16", "");
    let decoded = decode(&legacy, Variant::Argon2i).unwrap();
    assert_eq!(decoded.version, Version::V0x10);
    assert_eq!(verify(&legacy, b"password", Variant::Argon2i), Ok(()));
}

#[test]
fn decode_extracts_fields() {
    let decoded = decode(ARGON2ID_ENCODED, Variant::Argon2id).unwrap();

    assert_eq!(decoded.variant, Variant::Argon2id);
    assert_eq!(decoded.version, Version::V0x13);
    assert_eq!(decoded.m_cost, 65536);
    assert_eq!(decoded.t_cost, 2);
    assert_eq!(decoded.lanes, 1);
    assert_eq!(decoded.salt, b"somesalt");
    assert_eq!(
        hex::encode(decoded.hash.as_slice()),
        "09316115d5cf24ed5a15a31a3ba326e5cf32edc24702987c02b6566f61913cf7"
    );
}

#[test]
fn encode_reproduces_decoded_string() {
    let decoded = decode(ARGON2I_ENCODED, Variant::Argon2i).unwrap();
    assert_eq!(encode(&decoded).unwrap(), ARGON2I_ENCODED);
}

#[test]
fn malformed_strings_fail_to_decode() {
    let malformed = [
        "",
        "argon2id$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc",
        "$argon2id$v=19$m=65536,t=2$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc",
        "$argon2id$v=19$t=2,m=65536,p=1$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc",
        "$argon2id$v=19$m=065536,t=2,p=1$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc",
        "$argon2id$v=19$m=+65536,t=2,p=1$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc",
        "$argon2id$v=19$m=99999999999,t=2,p=1$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc",
        "$argon2id$v=18$m=65536,t=2,p=1$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc",
        "$argon2id$v=19$m=65536,t=2,p=1$c29tZXNhbHQ=$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc",
        "$argon2id$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc$",
        "$argon2id$v=19$m=65536,t=2,p=1$c29tZXNhbHQ",
        "$argon2x$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc",
    ];

    for encoded in malformed {
        assert_eq!(
            decode(encoded, Variant::Argon2id),
            Err(Error::DecodingFail),
            "{encoded}"
        );
    }
}

#[test]
fn out_of_range_lengths_fail_to_decode() {
    let short_salt = "$argon2id$v=19$m=65536,t=2,p=1$c2FsdA$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc";
    let short_hash = "$argon2id$v=19$m=65536,t=2,p=1$c29tZXNhbHQ$CTFh";

    for encoded in [short_salt, short_hash] {
        assert_eq!(
            decode(encoded, Variant::Argon2id),
            Err(Error::DecodingLengthFail),
            "{encoded}"
        );
    }
}

#[test]
fn short_tags_verify() {
    for tag_len in [4, 8, 11] {
        let params = Params::new(32, 1, 1, tag_len);
        let encoded = hash_encoded(b"password", b"saltsalt", &params, Variant::Argon2id).unwrap();

        assert_eq!(decode(&encoded, Variant::Argon2id).unwrap().hash.len(), tag_len);
        assert_eq!(verify(&encoded, b"password", Variant::Argon2id), Ok(()), "{encoded}");
        assert_eq!(
            verify(&encoded, b"passwore", Variant::Argon2id),
            Err(Error::VerifyMismatch)
        );
    }
}

#[test]
fn many_lanes_verify() {
    let params = Params::new(2048, 1, 256, 32);
    let encoded = hash_encoded(b"password", b"saltsalt", &params, Variant::Argon2id).unwrap();
    assert!(encoded.contains(",p=256$"));

    assert_eq!(decode(&encoded, Variant::Argon2id).unwrap().lanes, 256);
    assert_eq!(verify(&encoded, b"password", Variant::Argon2id), Ok(()));
}

#[test]
fn lane_bounds_are_left_to_the_validator() {
    let too_many_lanes = "$argon2id$v=19$m=134217728,t=2,p=16777216$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc";
    assert_eq!(decode(too_many_lanes, Variant::Argon2id).unwrap().lanes, 1 << 24);
    assert_eq!(
        verify(too_many_lanes, b"password", Variant::Argon2id),
        Err(Error::LanesTooMany)
    );
}

#[test]
fn keyed_params_are_not_encoded() {
    let keyed = Params::new(32, 1, 1, 32).with_secret(b"pepper".to_vec());
    assert_eq!(
        hash_encoded(b"password", b"saltsalt", &keyed, Variant::Argon2id),
        Err(Error::IncorrectParameter)
    );

    let bound = Params::new(32, 1, 1, 32).with_associated_data(b"user-42".to_vec());
    assert_eq!(
        hash_encoded(b"password", b"saltsalt", &bound, Variant::Argon2id),
        Err(Error::IncorrectParameter)
    );
}

#[test]
fn keyed_tags_verify_through_a_context() {
    let keyed = Params::new(32, 1, 1, 32).with_secret(b"pepper".to_vec());
    let expected = hash(b"password", b"saltsalt", &keyed, Variant::Argon2id).unwrap();

    let mut out = [0u8; 32];
    let mut pwd = *b"password";
    let mut secret = *b"pepper";
    let mut context = Context::new(&mut out, &mut pwd, b"saltsalt")
        .with_costs(1, 32, 1)
        .with_secret(&mut secret);
    assert_eq!(verify_ctx(&mut context, &expected, Variant::Argon2id), Ok(()));

    let mut out = [0u8; 32];
    let mut pwd = *b"password";
    let mut context = Context::new(&mut out, &mut pwd, b"saltsalt").with_costs(1, 32, 1);
    assert_eq!(
        verify_ctx(&mut context, &expected, Variant::Argon2id),
        Err(Error::VerifyMismatch)
    );
}

#[test]
fn decoded_parameters_are_validated() {
    let zero_time = "$argon2id$v=19$m=65536,t=0,p=1$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc";
    assert_eq!(
        verify(zero_time, b"password", Variant::Argon2id),
        Err(Error::TimeTooSmall)
    );

    let tiny_memory = "$argon2id$v=19$m=16,t=2,p=4$c29tZXNhbHQ$CTFhFdXPJO1aFaMaO6Mm5c8y7cJHAph8ArZWb2GRPPc";
    assert_eq!(
        verify(tiny_memory, b"password", Variant::Argon2id),
        Err(Error::MemoryTooLittle)
    );
}

#[test]
fn encoded_len_bounds_the_encoding() {
    let params = Params::new(65536, 2, 1, 32);
    let encoded = hash_encoded(b"password", b"somesalt", &params, Variant::Argon2id).unwrap();

    assert_eq!(
        encoded_len(2, 65536, 1, 8, 32, Variant::Argon2id),
        encoded.len() + 1
    );
}

#[test]
fn encode_rejects_short_inputs() {
    let parts = EncodedHash {
        variant: Variant::Argon2id,
        version: Version::V0x13,
        m_cost: 32,
        t_cost: 1,
        lanes: 1,
        salt: b"salt".to_vec(),
        hash: Zeroizing::new(vec![0u8; 32]),
    };
    assert_eq!(encode(&parts), Err(Error::SaltTooShort));
}

#[test]
fn length_helpers() {
    assert_eq!(b64len(0), 0);
    assert_eq!(b64len(1), 2);
    assert_eq!(b64len(2), 3);
    assert_eq!(b64len(3), 4);
    assert_eq!(b64len(8), 11);
    assert_eq!(b64len(32), 43);

    assert_eq!(numlen(0), 1);
    assert_eq!(numlen(9), 1);
    assert_eq!(numlen(10), 2);
    assert_eq!(numlen(65536), 5);
    assert_eq!(numlen(u32::MAX), 10);
}
