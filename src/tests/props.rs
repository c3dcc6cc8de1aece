use alloc::string::{String, ToString};

use quickcheck_macros::quickcheck;

use crate::{Format, ResolverOptions};

#[quickcheck]
fn compile_is_pure(pattern: String) -> bool {
    Format::compile(&pattern) == Format::compile(&pattern)
}

#[quickcheck]
fn compile_partitions_the_pattern(pattern: String) -> bool {
    // Tokens carry the source verbatim, so display reconstructs it.
    Format::compile(&pattern).to_string() == pattern
}

#[quickcheck]
fn percent_pairs_split_into_single_tokens(n: u8) -> bool {
    let n = usize::from(n % 32) + 1;

    let even = "%".repeat(2 * n);
    let odd = "%".repeat(2 * n + 1);

    Format::compile(&even).tokens().len() == n && Format::compile(&odd).tokens().len() == n + 1
}

#[quickcheck]
fn epoch_roundtrips_through_parse_and_format(seconds: i64) -> bool {
    // Reference range: exactly representable epoch seconds.
    let seconds = seconds % (1i64 << 53);
    let input = seconds.to_string();

    let format = Format::compile("%s");
    let timestamp = match crate::parse(&format, &input, &ResolverOptions::default()) {
        Ok(timestamp) => timestamp,
        Err(_) => return false,
    };

    timestamp.epoch_second() == seconds && crate::format(&format, &timestamp) == input
}

#[quickcheck]
fn fraction_digits_truncate_never_round(digits: u64) -> bool {
    let digits = digits.to_string();

    let format = Format::compile("%N");
    let parsed = match crate::parse_unresolved(&format, &digits) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    let significant: u32 = digits[..digits.len().min(9)].parse().unwrap();
    let scale = 10u32.pow(9 - digits.len().min(9) as u32);

    parsed.nano_of_second() == Some(significant * scale)
}

#[quickcheck]
fn parsing_never_panics(pattern: String, input: String) -> bool {
    let format = Format::compile(&pattern);
    let _ = crate::parse(&format, &input, &ResolverOptions::default());
    true
}
