/*
 * Copyright (C) 2022 taylor.fish <contact@taylor.fish>
 *
 * This file is part of basen.
 *
 * basen is free software: you can redistribute it and/or modify
 * it under the terms of the GNU Affero General Public License as published
 * by the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * basen is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU Affero General Public License for more details.
 *
 * You should have received a copy of the GNU Affero General Public License
 * along with basen. If not, see <https://www.gnu.org/licenses/>.
 */

use std::fs::File;
use std::io::{self, stdin, stdout, BufWriter, ErrorKind, Read, Write};
use std::path::PathBuf;

use basen::{Alphabet, DecodePolicy, Decoder, Encoder};
use basen::{BASE16_LOWER, BASE16_UPPER, BASE32, BASE64, BASE64_URL, ZBASE32};
use clap::{Parser, ValueEnum};
use eyre::{ensure, eyre, Result, WrapErr};
use tracing::{debug, trace};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const MIN_BUFFER_SIZE: usize = 8;

/// Encodes or decodes Base16/Base32/Base64 data from FILE and writes the
/// result to standard output.
#[derive(Debug, Parser)]
#[command(name = "basen", version)]
struct Args {
    /// Decode data instead of encoding.
    #[arg(short, long)]
    decode: bool,

    /// Alphabet to encode with or decode from.
    #[arg(short, long, value_enum, default_value_t = AlphabetName::Base64)]
    alphabet: AlphabetName,

    /// How a short final block is decoded. `eager` reads all of the input
    /// before decoding it in one pass.
    #[arg(long, value_enum, default_value_t = Policy::FlushGated)]
    policy: Policy,

    /// Size of the read buffer, in bytes.
    #[arg(long, default_value_t = 8192)]
    buffer_size: usize,

    /// Input file. Standard input is read if missing or "-".
    file: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AlphabetName {
    Base16,
    Base16Lower,
    Base32,
    Zbase32,
    Base64,
    Base64Url,
}

impl AlphabetName {
    fn alphabet(self) -> &'static Alphabet {
        match self {
            Self::Base16 => &BASE16_UPPER,
            Self::Base16Lower => &BASE16_LOWER,
            Self::Base32 => &BASE32,
            Self::Zbase32 => &ZBASE32,
            Self::Base64 => &BASE64,
            Self::Base64Url => &BASE64_URL,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    Eager,
    FlushGated,
}

/// Like [`Read::read`], but retries on interruption. Returns 0 only at the
/// end of the input or if `buf` is empty.
fn read_some(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            result => return result,
        }
    }
}

/// Moves the unconsumed tail of `buf[..filled]` to the front.
fn carry_over(buf: &mut [u8], used: usize, filled: usize) -> usize {
    buf.copy_within(used..filled, 0);
    filled - used
}

fn encode(
    reader: &mut impl Read,
    writer: &mut impl Write,
    encoder: Encoder<'_>,
    buffer_size: usize,
) -> Result<()> {
    let mut input = vec![0; buffer_size];
    let output_len = encoder
        .output_len(buffer_size)
        .ok_or_else(|| eyre!("buffer size {buffer_size} is too large"))?;
    let mut output = vec![0_u8; output_len];
    let mut filled = 0;

    loop {
        let n = read_some(reader, &mut input[filled..])
            .wrap_err("could not read input")?;
        filled += n;
        let eof = n == 0;
        let progress = encoder.convert(&input[..filled], &mut output, eof);
        trace!(read = n, ?progress, "encoded chunk");
        writer
            .write_all(&output[..progress.output_used])
            .wrap_err("could not write to standard output")?;
        filled = carry_over(&mut input, progress.input_used, filled);
        if eof {
            ensure!(progress.completed, "{filled} bytes left unencoded");
            return Ok(());
        }
    }
}

fn decode_streaming(
    reader: &mut impl Read,
    writer: &mut impl Write,
    decoder: Decoder<'_>,
    buffer_size: usize,
) -> Result<()> {
    let mut input = vec![0; buffer_size];
    let mut output = vec![0; decoder.max_output_len(buffer_size)];
    let mut filled = 0;

    loop {
        // A held-back block followed by a long run of noise can fill the
        // whole buffer.
        if filled == input.len() {
            input.resize(input.len() * 2, 0);
            output.resize(decoder.max_output_len(input.len()), 0);
            debug!(size = input.len(), "grew input buffer");
        }

        let n = read_some(reader, &mut input[filled..])
            .wrap_err("could not read input")?;
        filled += n;
        let eof = n == 0;
        let progress = decoder.convert(&input[..filled], &mut output, eof);
        trace!(read = n, ?progress, "decoded chunk");
        writer
            .write_all(&output[..progress.output_used])
            .wrap_err("could not write to standard output")?;
        filled = carry_over(&mut input, progress.input_used, filled);
        if eof {
            if !progress.completed {
                debug!(left = filled, "trailing symbols could not form a byte");
            }
            return Ok(());
        }
    }
}

fn decode_all(
    reader: &mut impl Read,
    writer: &mut impl Write,
    decoder: Decoder<'_>,
) -> Result<()> {
    let mut input = Vec::new();
    reader.read_to_end(&mut input).wrap_err("could not read input")?;
    let mut output = vec![0; decoder.output_len(&input[..])];
    let progress = decoder.convert(&input, &mut output, true);
    if !progress.completed {
        debug!(
            left = input.len() - progress.input_used,
            "trailing symbols could not form a byte"
        );
    }
    writer
        .write_all(&output[..progress.output_used])
        .wrap_err("could not write to standard output")
}

fn run(args: Args, reader: &mut impl Read) -> Result<()> {
    let alphabet = args.alphabet.alphabet();
    let mut writer = BufWriter::new(stdout().lock());
    debug!(alphabet = ?args.alphabet, decode = args.decode, "starting");

    if !args.decode {
        encode(reader, &mut writer, Encoder::new(alphabet), args.buffer_size)?;
    } else {
        match args.policy {
            Policy::FlushGated => decode_streaming(
                reader,
                &mut writer,
                Decoder::new(alphabet),
                args.buffer_size,
            )?,
            Policy::Eager => decode_all(
                reader,
                &mut writer,
                Decoder::with_policy(alphabet, DecodePolicy::EagerFinal),
            )?,
        }
    }
    writer.flush().wrap_err("could not write to standard output")
}

fn main() -> Result<()> {
    let _ = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();

    let args = Args::parse();
    ensure!(
        args.buffer_size >= MIN_BUFFER_SIZE,
        "buffer size must be at least {MIN_BUFFER_SIZE}"
    );

    match args.file.clone().filter(|path| path.as_os_str() != "-") {
        Some(path) => {
            let mut file = File::open(&path).wrap_err_with(|| {
                format!("could not open file '{}'", path.display())
            })?;
            run(args, &mut file)
        }
        None => run(args, &mut stdin().lock()),
    }
}
