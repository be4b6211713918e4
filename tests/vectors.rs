use basen::{decode_to_vec, encode_to_string, encode_to_vec, Alphabet, Decoder, Encoder};
use basen::{BASE16_LOWER, BASE16_UPPER, BASE32, BASE64, BASE64_URL, ZBASE32};

const RFC4648_INPUTS: [&str; 7] = ["", "f", "fo", "foo", "foob", "fooba", "foobar"];

fn check(alphabet: &Alphabet, expected: [&str; 7]) {
    for (input, expected) in RFC4648_INPUTS.iter().zip(expected) {
        assert_eq!(encode_to_string(alphabet, input.as_bytes()), expected);
        assert_eq!(decode_to_vec(alphabet, expected.as_bytes()), input.as_bytes());
    }
}

#[test]
fn rfc4648_base64() {
    check(&BASE64, ["", "Zg==", "Zm8=", "Zm9v", "Zm9vYg==", "Zm9vYmE=", "Zm9vYmFy"]);
}

#[test]
fn rfc4648_base32() {
    check(
        &BASE32,
        [
            "",
            "MY======",
            "MZXQ====",
            "MZXW6===",
            "MZXW6YQ=",
            "MZXW6YTB",
            "MZXW6YTBOI======",
        ],
    );
}

#[test]
fn rfc4648_base16() {
    check(
        &BASE16_UPPER,
        ["", "66", "666F", "666F6F", "666F6F62", "666F6F6261", "666F6F626172"],
    );
    check(
        &BASE16_LOWER,
        ["", "66", "666f", "666f6f", "666f6f62", "666f6f6261", "666f6f626172"],
    );
}

#[test]
fn single_block_scenarios() {
    assert_eq!(encode_to_string(&BASE32, &[244]), "6Q======");
    assert_eq!(encode_to_string(&BASE64, &[122]), "eg==");
    assert_eq!(encode_to_string(&BASE64_URL, &[251, 238, 210]), "--7S");
    assert_eq!(encode_to_string(&BASE64, &[251, 238, 210]), "++7S");
    assert_eq!(encode_to_string(&BASE16_LOWER, &[156]), "9c");
    assert_eq!(encode_to_string(&BASE16_UPPER, &[156]), "9C");
    assert_eq!(encode_to_string(&ZBASE32, &[112]), "qy");
}

#[test]
fn zbase32_never_pads() {
    for len in 0..40_usize {
        let data: Vec<u8> = (0..len).map(|i| (i * 37) as u8).collect();
        let s = encode_to_string(&ZBASE32, &data);
        assert!(!s.contains('='));
        assert_eq!(s.len(), (len * 8).div_ceil(5));
        assert_eq!(decode_to_vec(&ZBASE32, s.as_bytes()), data);
    }
}

#[test]
fn lengths_agree_over_block_residues() {
    let data: Vec<u8> = (0..1040_u32).map(|i| (i * 7 + 3) as u8).collect();
    for alphabet in [&BASE16_UPPER, &BASE16_LOWER, &BASE32, &ZBASE32, &BASE64, &BASE64_URL] {
        for len in 0..=data.len() {
            let symbols: Vec<u16> = encode_to_vec(alphabet, &data[..len]);
            assert_eq!(alphabet.encoded_len(len), Some(symbols.len()));
            assert_eq!(alphabet.decoded_len(&symbols), len);
        }
    }
}

#[test]
fn custom_alphabet() {
    let crockford = Alphabet::new(b"0123456789ABCDEFGHJKMNPQRSTVWXYZ", None).unwrap();
    let s = encode_to_string(&crockford, b"hello");
    assert_eq!(s, "D1JPRV3F");
    assert_eq!(decode_to_vec(&crockford, s.as_bytes()), b"hello");
}

#[test]
fn streaming_through_one_symbol_buffer_at_a_time() {
    // A buffer smaller than one block never makes progress; a buffer of
    // exactly one block always does.
    let encoder = Encoder::new(&BASE64);
    let decoder = Decoder::new(&BASE64);
    let data = b"streaming data!";
    let mut symbols = Vec::new();
    let mut block = ['\0'; 4];
    let mut pos = 0;
    while pos < data.len() {
        let p = encoder.convert(&data[pos..], &mut block[..3], true);
        assert_eq!((p.input_used, p.output_used), (0, 0));
        let p = encoder.convert(&data[pos..], &mut block, true);
        symbols.extend_from_slice(&block[..p.output_used]);
        pos += p.input_used;
    }
    assert_eq!(symbols.iter().collect::<String>(), "c3RyZWFtaW5nIGRhdGEh");

    let mut bytes = Vec::new();
    let mut out = [0_u8; 3];
    let mut pos = 0;
    while pos < symbols.len() {
        let p = decoder.convert(&symbols[pos..], &mut out, true);
        bytes.extend_from_slice(&out[..p.output_used]);
        pos += p.input_used;
    }
    assert_eq!(bytes, data);
}
