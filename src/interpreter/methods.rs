//! Methods on arrays, strings, numbers and objects
//!
//! Reading `xs.push` yields a native function bound to `xs`; calling it lands
//! in [`Interpreter::call_method`], which dispatches on the receiver's type.
//!
//! Strings are indexed by `char`, so positions and lengths count Unicode
//! scalar values. Callback-taking array methods visit indices up to the
//! length the array had when the call started and read each element live.

use std::rc::Rc;

use crate::interpreter::engine::Interpreter;
use crate::interpreter::errors::RuntimeError;
use crate::memory::value::{number_to_string, ArrayRef, Value};
use crate::parser::ast::SourceLocation;

const ARRAY_METHODS: &[&str] = &[
    "push", "pop", "shift", "unshift", "map", "filter", "forEach", "reduce", "find",
    "findIndex", "some", "every", "includes", "indexOf", "lastIndexOf", "join", "slice",
    "concat", "reverse", "sort", "flat", "toString",
];

const STRING_METHODS: &[&str] = &[
    "toUpperCase", "toLowerCase", "trim", "trimStart", "trimEnd", "split", "includes",
    "indexOf", "lastIndexOf", "slice", "substring", "charAt", "charCodeAt", "startsWith",
    "endsWith", "repeat", "replace", "replaceAll", "padStart", "padEnd", "concat", "toString",
];

const NUMBER_METHODS: &[&str] = &["toFixed", "toString"];

const OBJECT_METHODS: &[&str] = &["hasOwnProperty", "toString"];

fn find_method(table: &[&'static str], name: &str) -> Option<&'static str> {
    table.iter().copied().find(|m| *m == name)
}

pub(crate) fn array_method(name: &str) -> Option<&'static str> {
    find_method(ARRAY_METHODS, name)
}

pub(crate) fn string_method(name: &str) -> Option<&'static str> {
    find_method(STRING_METHODS, name)
}

pub(crate) fn number_method(name: &str) -> Option<&'static str> {
    find_method(NUMBER_METHODS, name)
}

pub(crate) fn object_method(name: &str) -> Option<&'static str> {
    find_method(OBJECT_METHODS, name)
}

/// Resolve a relative index (negative counts from the end) into `0..=len`
fn relative_index(value: Option<&Value>, len: usize, default: usize) -> usize {
    match value {
        None | Some(Value::Undefined) => default,
        Some(v) => {
            let n = v.to_number();
            if n.is_nan() {
                0
            } else if n < 0.0 {
                let from_end = len as f64 + n.trunc();
                if from_end < 0.0 {
                    0
                } else {
                    from_end as usize
                }
            } else {
                (n.trunc() as usize).min(len)
            }
        }
    }
}

fn char_to_byte(text: &str, char_index: usize) -> usize {
    text.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

fn byte_to_char(text: &str, byte_index: usize) -> usize {
    text[..byte_index].chars().count()
}

impl Interpreter<'_> {
    /// Call method `name` with `receiver` as `this`
    pub(crate) fn call_method(
        &mut self,
        name: &str,
        receiver: &Value,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match receiver {
            Value::Array(items) => {
                let items = Rc::clone(items);
                self.call_array_method(name, &items, receiver, args, location)
            }
            Value::String(text) => {
                let text = Rc::clone(text);
                self.call_string_method(name, &text, args, location)
            }
            Value::Number(n) => self.call_number_method(name, *n, &args, location),
            Value::Bool(b) if name == "toString" => Ok(Value::from(b.to_string())),
            Value::Object(obj) => match name {
                "hasOwnProperty" => {
                    let key = args.first().map(Value::to_js_string).unwrap_or_default();
                    Ok(Value::Bool(obj.borrow().properties.contains_key(&key)))
                }
                "toString" => Ok(Value::from(receiver.to_js_string())),
                _ => Err(Self::unknown_method(name, location)),
            },
            _ => Err(Self::unknown_method(name, location)),
        }
    }

    fn unknown_method(name: &str, location: SourceLocation) -> RuntimeError {
        RuntimeError::type_error(format!("{} is not a function", name), location)
    }

    fn expect_callback(
        &self,
        method: &str,
        value: Option<&Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match value {
            Some(f) if f.is_callable() => Ok(f.clone()),
            other => Err(RuntimeError::type_error(
                format!(
                    "{} is not a function (in Array.{})",
                    other.map(Value::to_js_string).unwrap_or_else(|| "undefined".into()),
                    method
                ),
                location,
            )),
        }
    }

    /// Element `i`, read live so callbacks that shrink the array are tolerated
    fn element(items: &ArrayRef, i: usize) -> Option<Value> {
        items.borrow().get(i).cloned()
    }

    // ===== Arrays =====

    fn call_array_method(
        &mut self,
        name: &str,
        items: &ArrayRef,
        receiver: &Value,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let len = items.borrow().len();

        match name {
            "push" => {
                self.check_collection_len(len + args.len(), location)?;
                let mut items = items.borrow_mut();
                items.extend(args);
                Ok(Value::Number(items.len() as f64))
            }
            "pop" => Ok(items.borrow_mut().pop().unwrap_or_default()),
            "shift" => {
                let mut items = items.borrow_mut();
                if items.is_empty() {
                    Ok(Value::Undefined)
                } else {
                    Ok(items.remove(0))
                }
            }
            "unshift" => {
                self.check_collection_len(len + args.len(), location)?;
                let mut items = items.borrow_mut();
                let tail = std::mem::take(&mut *items);
                items.extend(args);
                items.extend(tail);
                Ok(Value::Number(items.len() as f64))
            }

            "map" | "filter" | "forEach" | "find" | "findIndex" | "some" | "every" => {
                let callback = self.expect_callback(name, args.first(), location)?;
                let mut mapped = Vec::new();

                for i in 0..len {
                    let Some(item) = Self::element(items, i) else {
                        break;
                    };
                    let result = self.call_value(
                        &callback,
                        Value::Undefined,
                        vec![item.clone(), Value::Number(i as f64), receiver.clone()],
                        location,
                    )?;
                    match name {
                        "map" => mapped.push(result),
                        "filter" if result.is_truthy() => mapped.push(item),
                        "find" if result.is_truthy() => return Ok(item),
                        "findIndex" if result.is_truthy() => return Ok(Value::Number(i as f64)),
                        "some" if result.is_truthy() => return Ok(Value::Bool(true)),
                        "every" if !result.is_truthy() => return Ok(Value::Bool(false)),
                        _ => {}
                    }
                }

                Ok(match name {
                    "map" | "filter" => self.alloc_array(mapped),
                    "findIndex" => Value::Number(-1.0),
                    "some" => Value::Bool(false),
                    "every" => Value::Bool(true),
                    _ => Value::Undefined,
                })
            }

            "reduce" => {
                let callback = self.expect_callback(name, args.first(), location)?;
                let mut start = 0;
                let mut acc = match args.get(1) {
                    Some(initial) => initial.clone(),
                    None => {
                        let Some(first) = Self::element(items, 0) else {
                            return Err(RuntimeError::type_error(
                                "Reduce of empty array with no initial value",
                                location,
                            ));
                        };
                        start = 1;
                        first
                    }
                };
                for i in start..len {
                    let Some(item) = Self::element(items, i) else {
                        break;
                    };
                    acc = self.call_value(
                        &callback,
                        Value::Undefined,
                        vec![acc, item, Value::Number(i as f64), receiver.clone()],
                        location,
                    )?;
                }
                Ok(acc)
            }

            "includes" => {
                let needle = args.first().cloned().unwrap_or_default();
                let from = relative_index(args.get(1), len, 0);
                let found = items.borrow()[from..]
                    .iter()
                    .any(|item| item.same_value_zero(&needle));
                Ok(Value::Bool(found))
            }
            "indexOf" => {
                let needle = args.first().cloned().unwrap_or_default();
                let from = relative_index(args.get(1), len, 0);
                let position = items.borrow()[from..]
                    .iter()
                    .position(|item| item.strict_equals(&needle))
                    .map(|p| (p + from) as f64)
                    .unwrap_or(-1.0);
                Ok(Value::Number(position))
            }
            "lastIndexOf" => {
                let needle = args.first().cloned().unwrap_or_default();
                let position = items
                    .borrow()
                    .iter()
                    .rposition(|item| item.strict_equals(&needle))
                    .map(|p| p as f64)
                    .unwrap_or(-1.0);
                Ok(Value::Number(position))
            }

            "join" | "toString" => {
                let separator = match args.first() {
                    Some(Value::Undefined) | None => ",".to_string(),
                    Some(sep) if name == "join" => sep.to_js_string(),
                    Some(_) => ",".to_string(),
                };
                let joined = items
                    .borrow()
                    .iter()
                    .map(|item| {
                        if item.is_nullish() {
                            String::new()
                        } else {
                            item.to_js_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(&separator);
                self.check_string_len(&joined, location)?;
                Ok(Value::from(joined))
            }

            "slice" => {
                let start = relative_index(args.first(), len, 0);
                let end = relative_index(args.get(1), len, len);
                let slice = if start < end {
                    items.borrow()[start..end].to_vec()
                } else {
                    Vec::new()
                };
                Ok(self.alloc_array(slice))
            }

            "concat" => {
                let mut result = items.borrow().clone();
                for arg in args {
                    match arg {
                        Value::Array(other) => result.extend(other.borrow().iter().cloned()),
                        other => result.push(other),
                    }
                }
                self.check_collection_len(result.len(), location)?;
                Ok(self.alloc_array(result))
            }

            "reverse" => {
                items.borrow_mut().reverse();
                Ok(receiver.clone())
            }

            "sort" => {
                let comparator = match args.first() {
                    None | Some(Value::Undefined) => None,
                    Some(f) if f.is_callable() => Some(f.clone()),
                    Some(_) => {
                        return Err(RuntimeError::type_error(
                            "The comparison function must be either a function or undefined",
                            location,
                        ))
                    }
                };
                let snapshot = items.borrow().clone();
                let sorted = self.merge_sort(snapshot, comparator.as_ref(), location)?;
                *items.borrow_mut() = sorted;
                Ok(receiver.clone())
            }

            "flat" => {
                let depth = match args.first() {
                    None | Some(Value::Undefined) => 1,
                    Some(v) => {
                        let n = v.to_number();
                        if n.is_nan() || n < 1.0 {
                            0
                        } else {
                            n.min(64.0) as usize
                        }
                    }
                };
                let mut result = Vec::new();
                flatten_into(&items.borrow(), depth, &mut result);
                self.check_collection_len(result.len(), location)?;
                Ok(self.alloc_array(result))
            }

            _ => Err(Self::unknown_method(name, location)),
        }
    }

    /// Stable merge sort with a comparator that may call back into the script
    fn merge_sort(
        &mut self,
        items: Vec<Value>,
        comparator: Option<&Value>,
        location: SourceLocation,
    ) -> Result<Vec<Value>, RuntimeError> {
        if items.len() <= 1 {
            return Ok(items);
        }
        let mut items = items;
        let right = items.split_off(items.len() / 2);
        let left = self.merge_sort(items, comparator, location)?;
        let right = self.merge_sort(right, comparator, location)?;

        let mut merged = Vec::with_capacity(left.len() + right.len());
        let mut left = left.into_iter().peekable();
        let mut right = right.into_iter().peekable();
        while let (Some(a), Some(b)) = (left.peek(), right.peek()) {
            let take_right = self.sort_compare(a, b, comparator, location)? > 0.0;
            let next = if take_right { right.next() } else { left.next() };
            merged.extend(next);
        }
        merged.extend(left);
        merged.extend(right);
        Ok(merged)
    }

    /// Default order puts `undefined` last and compares the rest as strings
    fn sort_compare(
        &mut self,
        a: &Value,
        b: &Value,
        comparator: Option<&Value>,
        location: SourceLocation,
    ) -> Result<f64, RuntimeError> {
        match (a, b) {
            (Value::Undefined, Value::Undefined) => return Ok(0.0),
            (Value::Undefined, _) => return Ok(1.0),
            (_, Value::Undefined) => return Ok(-1.0),
            _ => {}
        }
        match comparator {
            Some(f) => {
                let result =
                    self.call_value(f, Value::Undefined, vec![a.clone(), b.clone()], location)?;
                let n = result.to_number();
                Ok(if n.is_nan() { 0.0 } else { n })
            }
            None => {
                let ordering = a.to_js_string().cmp(&b.to_js_string());
                Ok(ordering as i8 as f64)
            }
        }
    }

    // ===== Strings =====

    fn call_string_method(
        &mut self,
        name: &str,
        text: &str,
        args: Vec<Value>,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let arg_string = |i: usize| match args.get(i) {
            Some(v) => v.to_js_string(),
            None => "undefined".to_string(),
        };
        let char_len = text.chars().count();

        let result = match name {
            "toUpperCase" => Value::from(text.to_uppercase()),
            "toLowerCase" => Value::from(text.to_lowercase()),
            "trim" => Value::from(text.trim()),
            "trimStart" => Value::from(text.trim_start()),
            "trimEnd" => Value::from(text.trim_end()),
            "toString" => Value::from(text),

            "split" => {
                let parts: Vec<Value> = match args.first() {
                    None | Some(Value::Undefined) => vec![Value::from(text)],
                    Some(sep) => {
                        let sep = sep.to_js_string();
                        if sep.is_empty() {
                            text.chars().map(|c| Value::from(c.to_string())).collect()
                        } else {
                            text.split(sep.as_str()).map(Value::from).collect()
                        }
                    }
                };
                let parts = match args.get(1) {
                    Some(limit) if !matches!(limit, Value::Undefined) => {
                        let limit = limit.to_number();
                        let limit = if limit.is_nan() || limit < 0.0 { 0 } else { limit as usize };
                        parts.into_iter().take(limit).collect()
                    }
                    _ => parts,
                };
                self.alloc_array(parts)
            }

            "includes" | "indexOf" => {
                let needle = arg_string(0);
                let from = relative_index(args.get(1), char_len, 0);
                let from_byte = char_to_byte(text, from);
                let found = text[from_byte..]
                    .find(&needle)
                    .map(|b| byte_to_char(text, from_byte + b));
                if name == "includes" {
                    Value::Bool(found.is_some())
                } else {
                    Value::Number(found.map(|c| c as f64).unwrap_or(-1.0))
                }
            }
            "lastIndexOf" => {
                let needle = arg_string(0);
                let found = text.rfind(&needle).map(|b| byte_to_char(text, b) as f64);
                Value::Number(found.unwrap_or(-1.0))
            }

            "slice" => {
                let start = relative_index(args.first(), char_len, 0);
                let end = relative_index(args.get(1), char_len, char_len);
                Value::from(char_range(text, start, end))
            }
            "substring" => {
                let clamp = |v: Option<&Value>, default: usize| match v {
                    None | Some(Value::Undefined) => default,
                    Some(v) => {
                        let n = v.to_number();
                        if n.is_nan() || n < 0.0 {
                            0
                        } else {
                            (n as usize).min(char_len)
                        }
                    }
                };
                let a = clamp(args.first(), 0);
                let b = clamp(args.get(1), char_len);
                Value::from(char_range(text, a.min(b), a.max(b)))
            }
            "charAt" => {
                let i = args.first().map(Value::to_number).unwrap_or(0.0);
                let c = if i >= 0.0 {
                    text.chars().nth(i as usize)
                } else {
                    None
                };
                Value::from(c.map(String::from).unwrap_or_default())
            }
            "charCodeAt" => {
                let i = args.first().map(Value::to_number).unwrap_or(0.0);
                let c = if i >= 0.0 {
                    text.chars().nth(i as usize)
                } else {
                    None
                };
                Value::Number(c.map(|c| c as u32 as f64).unwrap_or(f64::NAN))
            }
            "startsWith" => {
                let position = relative_index(args.get(1), char_len, 0);
                Value::Bool(text[char_to_byte(text, position)..].starts_with(&arg_string(0)))
            }
            "endsWith" => {
                let end = match args.get(1) {
                    None | Some(Value::Undefined) => char_len,
                    Some(v) => (v.to_number().max(0.0) as usize).min(char_len),
                };
                Value::Bool(text[..char_to_byte(text, end)].ends_with(&arg_string(0)))
            }

            "repeat" => {
                let count = args.first().map(Value::to_number).unwrap_or(0.0);
                if count < 0.0 || count.is_infinite() {
                    return Err(RuntimeError::range(
                        format!("Invalid count value: {}", number_to_string(count)),
                        location,
                    ));
                }
                let count = if count.is_nan() { 0 } else { count as usize };
                self.check_collection_len(text.chars().count().saturating_mul(count), location)?;
                Value::from(text.repeat(count))
            }

            "replace" | "replaceAll" => {
                let pattern = arg_string(0);
                let replacement = args.get(1).cloned().unwrap_or_default();
                self.string_replace(text, &pattern, &replacement, name == "replaceAll", location)?
            }

            "padStart" | "padEnd" => {
                let target = args.first().map(Value::to_number).unwrap_or(0.0);
                let target = if target.is_nan() || target < 0.0 { 0 } else { target as usize };
                let fill = match args.get(1) {
                    None | Some(Value::Undefined) => " ".to_string(),
                    Some(v) => v.to_js_string(),
                };
                if target <= char_len || fill.is_empty() {
                    Value::from(text)
                } else {
                    self.check_collection_len(target, location)?;
                    let padding: String = fill.chars().cycle().take(target - char_len).collect();
                    if name == "padStart" {
                        Value::from(padding + text)
                    } else {
                        Value::from(format!("{}{}", text, padding))
                    }
                }
            }

            "concat" => {
                let mut out = text.to_string();
                for arg in &args {
                    out.push_str(&arg.to_js_string());
                }
                self.check_string_len(&out, location)?;
                Value::from(out)
            }

            _ => return Err(Self::unknown_method(name, location)),
        };
        Ok(result)
    }

    /// Literal (non-regex) replacement of the first or every occurrence; a
    /// function replacement is called with the matched text
    fn string_replace(
        &mut self,
        text: &str,
        pattern: &str,
        replacement: &Value,
        all: bool,
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;
        let mut offset = 0;
        loop {
            let Some(found) = rest.find(pattern) else {
                break;
            };
            out.push_str(&rest[..found]);
            let with = if replacement.is_callable() {
                let args = vec![
                    Value::from(pattern),
                    Value::Number(byte_to_char(text, offset + found) as f64),
                    Value::from(text),
                ];
                self.call_value(replacement, Value::Undefined, args, location)?
                    .to_js_string()
            } else {
                replacement.to_js_string()
            };
            out.push_str(&with);

            // An empty pattern matches between every character
            let advance = if pattern.is_empty() {
                match rest[found..].chars().next() {
                    Some(c) => {
                        out.push(c);
                        found + c.len_utf8()
                    }
                    None => {
                        rest = "";
                        break;
                    }
                }
            } else {
                found + pattern.len()
            };
            rest = &rest[advance..];
            offset += advance;
            if !all {
                break;
            }
            self.check_string_len(&out, location)?;
        }
        out.push_str(rest);
        self.check_string_len(&out, location)?;
        Ok(Value::from(out))
    }

    // ===== Numbers =====

    fn call_number_method(
        &mut self,
        name: &str,
        n: f64,
        args: &[Value],
        location: SourceLocation,
    ) -> Result<Value, RuntimeError> {
        match name {
            "toFixed" => {
                let digits = args.first().map(Value::to_number).unwrap_or(0.0);
                let digits = if digits.is_nan() { 0.0 } else { digits.trunc() };
                if !(0.0..=100.0).contains(&digits) {
                    return Err(RuntimeError::range(
                        "toFixed() digits argument must be between 0 and 100",
                        location,
                    ));
                }
                Ok(Value::from(to_fixed(n, digits as usize)))
            }
            "toString" => match args.first() {
                None | Some(Value::Undefined) => Ok(Value::from(number_to_string(n))),
                Some(radix) => {
                    let radix = radix.to_number().trunc();
                    if !(2.0..=36.0).contains(&radix) {
                        return Err(RuntimeError::range(
                            "toString() radix must be between 2 and 36",
                            location,
                        ));
                    }
                    Ok(Value::from(to_radix_string(n, radix as u32)))
                }
            },
            _ => Err(Self::unknown_method(name, location)),
        }
    }
}

fn char_range(text: &str, start: usize, end: usize) -> String {
    if start >= end {
        return String::new();
    }
    text.chars().skip(start).take(end - start).collect()
}

fn flatten_into(items: &[Value], depth: usize, out: &mut Vec<Value>) {
    for item in items {
        match item {
            Value::Array(inner) if depth > 0 => flatten_into(&inner.borrow(), depth - 1, out),
            other => out.push(other.clone()),
        }
    }
}

/// `Number.prototype.toFixed`: exact decimal rounding with halves rounded
/// away from zero
pub(crate) fn to_fixed(n: f64, digits: usize) -> String {
    if !n.is_finite() || n.abs() >= 1e21 {
        return number_to_string(n);
    }

    // Every finite double has a terminating decimal expansion of at most
    // 1074 fractional digits, so this string is exact
    let exact = format!("{:.1100}", n.abs());
    let (int_part, frac_part) = exact.split_once('.').unwrap_or((exact.as_str(), ""));

    let mut kept: Vec<u8> = int_part
        .bytes()
        .chain(frac_part.bytes().take(digits))
        .map(|b| b - b'0')
        .collect();
    let round_up = frac_part.as_bytes().get(digits).is_some_and(|d| *d >= b'5');

    if round_up {
        let mut i = kept.len();
        loop {
            if i == 0 {
                kept.insert(0, 1);
                break;
            }
            i -= 1;
            if kept[i] == 9 {
                kept[i] = 0;
            } else {
                kept[i] += 1;
                break;
            }
        }
    }

    let split = kept.len() - digits;
    let mut out = String::new();
    if n < 0.0 {
        out.push('-');
    }
    out.extend(kept[..split].iter().map(|d| (b'0' + d) as char));
    if digits > 0 {
        out.push('.');
        out.extend(kept[split..].iter().map(|d| (b'0' + d) as char));
    }
    out
}

/// `Number.prototype.toString(radix)` for radixes other than 10
fn to_radix_string(n: f64, radix: u32) -> String {
    if radix == 10 || !n.is_finite() {
        return number_to_string(n);
    }
    let negative = n < 0.0;
    let abs = n.abs();
    let mut int_part = abs.trunc();
    let mut frac = abs - int_part;

    let mut int_digits = Vec::new();
    if int_part == 0.0 {
        int_digits.push('0');
    }
    while int_part >= 1.0 {
        let d = (int_part % radix as f64) as u32;
        int_digits.push(std::char::from_digit(d, radix).unwrap_or('0'));
        int_part = (int_part / radix as f64).trunc();
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.extend(int_digits.iter().rev());

    if frac > 0.0 {
        out.push('.');
        for _ in 0..20 {
            frac *= radix as f64;
            let d = frac.trunc() as u32;
            out.push(std::char::from_digit(d, radix).unwrap_or('0'));
            frac -= d as f64;
            if frac == 0.0 {
                break;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::test_support::{run, run_err};

    #[test]
    fn test_to_fixed_rounding() {
        assert_eq!(to_fixed(3.14159, 2), "3.14");
        assert_eq!(to_fixed(2.5, 0), "3");
        assert_eq!(to_fixed(1.25, 1), "1.3");
        assert_eq!(to_fixed(1.005, 2), "1.00");
        assert_eq!(to_fixed(-1.5, 0), "-2");
        assert_eq!(to_fixed(-0.0001, 2), "-0.00");
        assert_eq!(to_fixed(-0.0, 1), "0.0");
        assert_eq!(to_fixed(9.995, 2), "9.99");
        assert_eq!(to_fixed(99.5, 0), "100");
        assert_eq!(to_fixed(1e21, 2), "1e+21");
        assert_eq!(to_fixed(42.0, 3), "42.000");
    }

    #[test]
    fn test_radix_strings() {
        assert_eq!(to_radix_string(255.0, 16), "ff");
        assert_eq!(to_radix_string(-10.0, 2), "-1010");
        assert_eq!(to_radix_string(0.5, 2), "0.1");
    }

    #[test]
    fn test_relative_index() {
        assert_eq!(relative_index(Some(&Value::Number(-2.0)), 5, 0), 3);
        assert_eq!(relative_index(Some(&Value::Number(-9.0)), 5, 0), 0);
        assert_eq!(relative_index(Some(&Value::Number(9.0)), 5, 0), 5);
        assert_eq!(relative_index(None, 5, 5), 5);
    }

    #[test]
    fn test_array_mutators() {
        let src = "const a = [2, 3];\nconsole.log(a.push(4, 5), a.unshift(1), a.pop(), a.shift(), a.join('|'));";
        assert_eq!(run(src), ["4 5 5 1 2|3|4"]);
    }

    #[test]
    fn test_array_callbacks() {
        let src = "const n = [1, 2, 3, 4, 5];\nconsole.log(n.map(x => x * 2).join(), n.filter(x => x % 2).join());\nconsole.log(n.reduce((a, b) => a + b, 0), n.reduce((a, b) => a * b));\nconsole.log(n.find(x => x > 3), n.findIndex(x => x > 3), n.find(x => x > 9));\nconsole.log(n.some(x => x > 4), n.every(x => x > 0));\nlet seen = [];\nn.forEach((x, i) => seen.push(i));\nconsole.log(seen.join(''));";
        assert_eq!(
            run(src),
            ["2,4,6,8,10 1,3,5", "15 120", "4 3 undefined", "true true", "01234"]
        );
    }

    #[test]
    fn test_array_search_and_slice() {
        let src = "const a = [1, 2, 3, NaN];\nconsole.log(a.includes(NaN), a.indexOf(NaN), a.indexOf(3), a.slice(1, -1).join(), a.slice(-2).length);\nconsole.log([1, [2, [3]]].flat().length, [1].concat([2, 3], 4).join(), [1, 2, 3].reverse().join());";
        assert_eq!(run(src), ["true -1 2 2,3 2", "3 1,2,3,4 3,2,1"]);
    }

    #[test]
    fn test_sort_default_and_comparator() {
        let src = "console.log([10, 9, 1, 100].sort().join(), [10, 9, 1, 100].sort((a, b) => a - b).join());\nconst people = [{ n: 'b', a: 30 }, { n: 'a', a: 25 }, { n: 'c', a: 30 }];\nconsole.log(people.sort((x, y) => x.a - y.a).map(p => p.n).join(''));";
        assert_eq!(run(src), ["1,10,100,9 1,9,10,100", "abc"]);
    }

    #[test]
    fn test_reduce_empty_array() {
        assert_eq!(
            run_err("[].reduce((a, b) => a + b);"),
            "TypeError: Reduce of empty array with no initial value"
        );
    }

    #[test]
    fn test_string_methods() {
        let src = "const s = '  Hello, World  ';\nconst t = s.trim();\nconsole.log(t.toUpperCase(), t.toLowerCase(), t.length);\nconsole.log(t.split(', ').join('|'), t.includes('World'), t.indexOf('o'), t.lastIndexOf('o'));\nconsole.log(t.slice(-5), t.substring(5, 0), t.charAt(4), t.startsWith('Hell'), t.endsWith('!'));\nconsole.log('ab'.repeat(3), 'a-b-c'.replace('-', '+'), 'a-b-c'.replaceAll('-', ''), '5'.padStart(3, '0'), 'x'.padEnd(3, '.'));";
        assert_eq!(
            run(src),
            [
                "HELLO, WORLD hello, world 12",
                "Hello|World true 4 8",
                "World Hello o true false",
                "ababab a+b-c abc 005 x.."
            ]
        );
    }

    #[test]
    fn test_number_methods() {
        let src = "const pi = 3.14159;\nconsole.log(pi.toFixed(2), (255).toString(16), (10).toString(), (0.1 + 0.2).toFixed(10));";
        assert_eq!(run(src), ["3.14 ff 10 0.3000000000"]);
    }

    #[test]
    fn test_to_fixed_range_error() {
        assert_eq!(
            run_err("(1).toFixed(101);"),
            "RangeError: toFixed() digits argument must be between 0 and 100"
        );
    }

    #[test]
    fn test_has_own_property() {
        assert_eq!(run("const o = { a: 1 };\nconsole.log(o.hasOwnProperty('a'), o.hasOwnProperty('b'));"), ["true false"]);
    }

    #[test]
    fn test_callback_must_be_function() {
        assert_eq!(
            run_err("[1].map(5);"),
            "TypeError: 5 is not a function (in Array.map)"
        );
    }

    #[test]
    fn test_string_limits_count_chars() {
        use crate::interpreter::test_support::run_with_limits;
        use crate::runner::limits::Limits;

        let limits = Limits {
            max_collection_len: 10,
            ..Limits::default()
        };
        let src = "const s = 'é'.repeat(10);\nconsole.log(s.length, ('éé' + 'éééééééé').length, '😀'.length);";
        let (result, lines) = run_with_limits(src, limits);
        assert!(result.is_ok(), "{:?}", result);
        assert_eq!(lines, ["10 10 1"]);

        let (result, _) = run_with_limits("'é'.repeat(11);", limits);
        assert!(result.unwrap_err().starts_with("RangeError: Invalid length 11"));
        let (result, _) = run_with_limits("const s = 'ééééé' + 'éééééé';", limits);
        assert!(result.unwrap_err().starts_with("RangeError: Invalid length 11"));
    }
}

