//! Textual forms of an `EncryptedSecret`.
//!
//! Each share is one line, `KEYID(VALUE)` or `KEYID(VALUE)(HELPER)`, with
//! the ciphertexts in standard base64. The PEM form wraps those lines in a
//! block labelled `MULTIKEY ENCRYPTED SECRET`.

use std::{fmt, str::FromStr};

use base64::{Engine as _, engine::general_purpose::STANDARD};

use crate::{
    EncryptedSecret, EncryptedShare, EncryptedShareKind, Error, FormatError, Result,
    constants::PEM_LABEL,
};

impl EncryptedSecret {
    pub fn encode(&self) -> String {
        self.shares()
            .iter()
            .map(encode_share)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse the output of `encode`. Blank lines are ignored; any other
    /// malformed line fails the whole decode.
    pub fn decode(text: &str) -> Result<Self> {
        let mut shares = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            shares.push(decode_share(line, index + 1)?);
        }
        if shares.is_empty() {
            return Err(FormatError::Empty.into());
        }
        Ok(Self::new(shares))
    }

    pub fn to_pem(&self) -> String {
        pem::encode(&pem::Pem::new(PEM_LABEL, self.encode().into_bytes()))
    }

    pub fn from_pem(text: &str) -> Result<Self> {
        let block = pem::parse(text).map_err(FormatError::Pem)?;
        if block.tag() != PEM_LABEL {
            return Err(FormatError::WrongLabel(block.tag().to_string()).into());
        }
        let body = std::str::from_utf8(block.contents()).map_err(|_| FormatError::NotUtf8)?;
        Self::decode(body)
    }
}

impl fmt::Display for EncryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for EncryptedSecret {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

fn encode_share(share: &EncryptedShare) -> String {
    let mut token = format!("{}({})", share.key_id(), STANDARD.encode(share.value()));
    if let Some(helper) = share.helper() {
        token.push('(');
        token.push_str(&STANDARD.encode(helper));
        token.push(')');
    }
    token
}

fn decode_share(line: &str, line_number: usize) -> Result<EncryptedShare> {
    let open = line
        .find('(')
        .ok_or(FormatError::MissingParenthesis { line: line_number })?;
    let key_id = &line[..open];
    if key_id.is_empty() {
        return Err(FormatError::MissingKeyId { line: line_number }.into());
    }
    if key_id.contains(')') {
        return Err(FormatError::MissingParenthesis { line: line_number }.into());
    }

    let mut groups = Vec::with_capacity(2);
    let mut rest = &line[open..];
    while !rest.is_empty() {
        if groups.len() == 2 {
            return Err(FormatError::TrailingData { line: line_number }.into());
        }
        let inner = rest
            .strip_prefix('(')
            .ok_or(FormatError::TrailingData { line: line_number })?;
        let close = inner
            .find(')')
            .ok_or(FormatError::MissingParenthesis { line: line_number })?;
        groups.push(decode_group(&inner[..close], line_number)?);
        rest = &inner[close + 1..];
    }

    let mut groups = groups.into_iter();
    let value = groups
        .next()
        .ok_or(FormatError::MissingParenthesis { line: line_number })?;
    let kind = match groups.next() {
        Some(helper) => EncryptedShareKind::WithHelper(helper),
        None => EncryptedShareKind::Plain,
    };
    Ok(EncryptedShare::new(value, key_id, kind))
}

fn decode_group(group: &str, line_number: usize) -> Result<Vec<u8>> {
    if group.is_empty() {
        return Err(FormatError::EmptyValue { line: line_number }.into());
    }
    if group.contains('(') {
        return Err(FormatError::MissingParenthesis { line: line_number }.into());
    }
    STANDARD.decode(group).map_err(|source| {
        FormatError::Base64 {
            line: line_number,
            source,
        }
        .into()
    })
}
