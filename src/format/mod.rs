//! Format compilation: tokenizing a `%`-directive pattern into an immutable
//! token sequence shared by the parsing and formatting engines.

mod directive;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::num::IntErrorKind;
use core::str;

use bitflags::bitflags;

use crate::format::directive::{E_MODIFIER_SPECS, O_MODIFIER_SPECS};
use crate::utils::Cursor;

pub use self::directive::Directive;
pub(crate) use self::directive::FieldKind;

bitflags! {
    /// Case and sign-padding flags of a directive.
    pub(crate) struct Flags: u32 {
        /// Use left padding, removing all other padding options in most cases.
        const LEFT_PADDING = 1 << 0;
        /// Change case for a string value.
        const CHANGE_CASE  = 1 << 1;
        /// Convert a string value to uppercase.
        const UPPER_CASE   = 1 << 2;
    }
}

impl Flags {
    /// Check if one of the case flags is set.
    pub(crate) fn has_change_or_upper_case(self) -> bool {
        let flag = Flags::CHANGE_CASE | Flags::UPPER_CASE;
        !self.intersection(flag).is_empty()
    }
}

/// Padding method of a directive.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Padding {
    /// The directive's own default padding.
    Left,
    /// Padding with spaces (`_` flag).
    Spaces,
    /// Padding with zeros (`0` flag).
    Zeros,
}

/// Options attached to a single directive: padding, minimum width, case
/// flags, and the `%z` colon count.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DirectiveOptions {
    pub(crate) width: Option<usize>,
    pub(crate) padding: Padding,
    pub(crate) flags: Flags,
    pub(crate) colons: u8,
}

impl DirectiveOptions {
    /// Options of a directive written without any flag, width, or modifier.
    pub const EMPTY: Self = Self {
        width: None,
        padding: Padding::Left,
        flags: Flags::empty(),
        colons: 0,
    };

    /// Minimum field width, if one was written.
    pub fn width(&self) -> Option<usize> {
        self.width
    }

    /// Padding override.
    pub fn padding(&self) -> Padding {
        self.padding
    }

    /// Number of colons preceding a `z` specifier.
    pub fn colons(&self) -> u8 {
        self.colons
    }

    /// Whether the `-` flag was written.
    pub fn no_padding(&self) -> bool {
        self.flags.contains(Flags::LEFT_PADDING)
    }

    /// Whether the `^` flag was written.
    pub fn upper_case(&self) -> bool {
        self.flags.contains(Flags::UPPER_CASE)
    }

    /// Whether the `#` flag was written.
    pub fn change_case(&self) -> bool {
        self.flags.contains(Flags::CHANGE_CASE)
    }

    /// True when the options carry anything the parsing engine does not
    /// honor.
    fn ignored_by_parser(&self) -> bool {
        self.width.is_some()
            || self.padding != Padding::Left
            || !self.flags.is_empty()
            || self.colons == 4
    }
}

/// A single compiled token: an immediate literal or a directive.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum FormatToken {
    /// One or more literal characters, matched and echoed verbatim.
    Immediate(String),
    /// A recognized `%` directive.
    Directive {
        /// Exact source spelling, echoed by the formatter for specifiers it
        /// does not honor.
        raw: String,
        /// Symbolic directive kind.
        directive: Directive,
        /// Flags, width, and colon count.
        options: DirectiveOptions,
    },
}

/// A compiled format: an immutable ordered sequence of tokens.
///
/// Two formats are equal iff their token sequences are equal. Compilation is
/// total: unrecognized directives degrade to immediate literals.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Format {
    tokens: Vec<FormatToken>,
}

impl Format {
    /// Compile a pattern into a token sequence. Never fails.
    pub fn compile(pattern: &str) -> Format {
        let mut compiler = Compiler::new(pattern);
        compiler.run();
        Format {
            tokens: compiler.tokens,
        }
    }

    /// The compiled token sequence.
    pub fn tokens(&self) -> &[FormatToken] {
        &self.tokens
    }

    /// True if any token uses a width, padding, case flag, or four-colon
    /// `%z` — options the parsing engine does not honor.
    pub fn only_for_formatter(&self) -> bool {
        self.tokens.iter().any(|token| match token {
            FormatToken::Immediate(_) => false,
            FormatToken::Directive { options, .. } => options.ignored_by_parser(),
        })
    }

    /// Total length in bytes of the source pattern.
    pub(crate) fn source_len(&self) -> usize {
        self.tokens
            .iter()
            .map(|token| match token {
                FormatToken::Immediate(text) => text.len(),
                FormatToken::Directive { raw, .. } => raw.len(),
            })
            .sum()
    }
}

impl fmt::Display for Format {
    /// Reconstructs the source pattern, byte for byte.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            match token {
                FormatToken::Immediate(text) => f.write_str(text)?,
                FormatToken::Directive { raw, .. } => f.write_str(raw)?,
            }
        }
        Ok(())
    }
}

/// Single-pass pattern scanner.
struct Compiler<'a> {
    cursor: Cursor<'a>,
    tokens: Vec<FormatToken>,
    /// Pending literal bytes, flushed when a directive is emitted or the
    /// pattern ends. Buffered as bytes so that a degraded directive can
    /// splice back a partial UTF-8 sequence before the flush.
    literal: Vec<u8>,
}

impl<'a> Compiler<'a> {
    fn new(pattern: &'a str) -> Self {
        Self {
            cursor: Cursor::new(pattern.as_bytes()),
            tokens: Vec::new(),
            literal: Vec::new(),
        }
    }

    fn run(&mut self) {
        loop {
            let run = self.cursor.read_until(|&x| x == b'%');
            self.literal.extend_from_slice(run);

            let checkpoint = self.cursor.remaining();
            if self.cursor.next().is_none() {
                break;
            }

            match self.scan_directive() {
                Some((directive, options)) => {
                    let matched = checkpoint.len() - self.cursor.remaining().len();
                    self.flush_literal();
                    self.tokens.push(FormatToken::Directive {
                        raw: into_string(&checkpoint[..matched]),
                        directive,
                        options,
                    });
                }
                None => {
                    // No valid directive; the matched bytes become literal
                    // text, `%` included.
                    let matched = checkpoint.len() - self.cursor.remaining().len();
                    self.literal.extend_from_slice(&checkpoint[..matched]);
                }
            }
        }

        self.flush_literal();
    }

    fn flush_literal(&mut self) {
        if !self.literal.is_empty() {
            let text = into_string(&core::mem::take(&mut self.literal));
            self.tokens.push(FormatToken::Immediate(text));
        }
    }

    /// Scan one directive after its `%`. Returns `None` when the sequence is
    /// not a recognized directive and must degrade to a literal.
    fn scan_directive(&mut self) -> Option<(Directive, DirectiveOptions)> {
        // Parse flags
        let mut padding = Padding::Left;
        let mut flags = Flags::empty();

        loop {
            // The left padding overrides the other padding options for most
            // cases. It is also used for the hour sign in the %z specifier.
            //
            // Similarly, the change case flag overrides the upper case flag,
            // except when using recurred specifiers.
            match self.cursor.peek() {
                Some(b'-') => {
                    padding = Padding::Left;
                    flags.insert(Flags::LEFT_PADDING);
                }
                Some(b'_') => padding = Padding::Spaces,
                Some(b'0') => padding = Padding::Zeros,
                Some(b'^') => flags.insert(Flags::UPPER_CASE),
                Some(b'#') => flags.insert(Flags::CHANGE_CASE),
                _ => break,
            }
            self.cursor.next();
        }

        // Parse width. The reference caps the width at `INT_MAX`; anything
        // larger degrades to a literal.
        let width_digits = str::from_utf8(self.cursor.read_while(u8::is_ascii_digit))
            .expect("reading ASCII digits should yield a valid UTF-8 slice");

        let width = match width_digits.parse::<usize>() {
            Ok(width) if width <= i32::MAX as usize => Some(width),
            Ok(_) => return None,
            Err(err) if *err.kind() == IntErrorKind::Empty => None,
            Err(_) => return None,
        };

        // POSIX locale extensions are a no-op for the specifiers that accept
        // them; anywhere else the whole run degrades.
        if let Some(&[ext, spec]) = self.cursor.remaining().get(..2) {
            match ext {
                b'E' if E_MODIFIER_SPECS.binary_search(&spec).is_ok() => self.cursor.next(),
                b'O' if O_MODIFIER_SPECS.binary_search(&spec).is_ok() => self.cursor.next(),
                _ => None,
            };
        }

        // Parse spec
        let colons = self.cursor.read_while(|&x| x == b':');

        if colons.is_empty() {
            let directive = Directive::lookup(self.cursor.next()?)?;
            let options = DirectiveOptions {
                width,
                padding,
                flags,
                colons: 0,
            };
            Some((directive, options))
        } else if colons.len() <= 4 && self.cursor.read_optional_tag(b"z") {
            // `%::::z` compiles but is honored by the formatter only.
            let options = DirectiveOptions {
                width,
                padding,
                flags,
                colons: colons.len() as u8,
            };
            Some((Directive::TimeOffset, options))
        } else {
            None
        }
    }
}

/// Rebuild a string from literal bytes. Sound because the scanner only
/// splits the pattern at ASCII bytes, which are always char boundaries.
fn into_string(bytes: &[u8]) -> String {
    String::from_utf8(bytes.to_vec()).expect("literal runs are split at ASCII boundaries")
}
