//! Diagnostic message formatting
//!
//! Renders `{}` templates against positional [`Arg`]s. Rendering never fails:
//! values whose `Display` errors or panics are replaced by a marker, and
//! self-referencing arrays are cut off with `...`.
//!
//! ```
//! use eclint_core::args;
//! use eclint_core::message::format_message;
//!
//! let line = format_message("{}@{},{}", args!["src/a.txt", 3, 14]);
//! assert_eq!(line, "src/a.txt@3,14");
//! ```

use std::cell::RefCell;
use std::fmt::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::rc::Rc;

const DELIM_START: char = '{';
const DELIM: &str = "{}";
const ESCAPE: u8 = b'\\';

/// Emitted in place of a value whose `Display` implementation failed.
pub const FAILED_RENDERING: &str = "[FAILED to format]";

/// Emitted in place of an array that is already being rendered further up.
pub const CYCLE_MARKER: &str = "...";

/// A single positional argument of a message template.
#[derive(Clone)]
pub enum Arg {
    Null,
    Value(Rc<dyn fmt::Display>),
    Primitives(Vec<Primitive>),
    Array(ArgArray),
}

impl Arg {
    /// Wrap any displayable value.
    pub fn display(value: impl fmt::Display + 'static) -> Self {
        Self::Value(Rc::new(value))
    }
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rendered = String::new();
        render(&mut rendered, self, &mut Vec::new());
        f.debug_tuple("Arg").field(&rendered).finish()
    }
}

/// Element of a primitive array argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{}", v),
            Self::Char(v) => write!(f, "{}", v),
            Self::Int(v) => write!(f, "{}", v),
            Self::UInt(v) => write!(f, "{}", v),
            Self::Float(v) => write!(f, "{}", v),
        }
    }
}

/// A shared, growable array of arguments.
///
/// Clones share storage, so an array can be pushed into itself; the
/// renderer detects such cycles.
#[derive(Clone, Default)]
pub struct ArgArray(Rc<RefCell<Vec<Arg>>>);

impl ArgArray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Arg>) -> Self {
        Self(Rc::new(RefCell::new(items)))
    }

    pub fn push(&self, item: impl Into<Arg>) {
        self.0.borrow_mut().push(item.into());
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn identity(&self) -> *const RefCell<Vec<Arg>> {
        Rc::as_ptr(&self.0)
    }
}

/// Substitute `args` into `template`, left to right.
///
/// - `\{}` emits a literal `{}` and consumes no argument.
/// - `\\{}` emits one `\` followed by the next argument.
/// - Markers beyond the last argument are copied verbatim.
/// - With no markers, or no arguments, the template is returned unchanged.
///
/// A value whose `Display` panics renders as [`FAILED_RENDERING`]. The
/// panic still goes through the process panic hook, so the default hook
/// prints it to stderr. Install a quiet hook to silence it.
pub fn format_message(template: &str, args: &[Arg]) -> String {
    let mut out = String::with_capacity(template.len() + 50);
    let mut cursor = 0;
    let mut consumed = 0;

    while consumed < args.len() {
        let Some(offset) = template[cursor..].find(DELIM) else {
            if cursor == 0 {
                return template.to_string();
            }
            out.push_str(&template[cursor..]);
            return out;
        };
        let at = cursor + offset;

        if is_escaped(template, at) {
            if !is_double_escaped(template, at) {
                out.push_str(&template[cursor..at - 1]);
                out.push(DELIM_START);
                cursor = at + 1;
                continue;
            }
            // the escape is itself escaped: keep one backslash, substitute
            out.push_str(&template[cursor..at - 1]);
        } else {
            out.push_str(&template[cursor..at]);
        }
        render(&mut out, &args[consumed], &mut Vec::new());
        consumed += 1;
        cursor = at + DELIM.len();
    }

    out.push_str(&template[cursor..]);
    out
}

fn is_escaped(template: &str, at: usize) -> bool {
    at > 0 && template.as_bytes()[at - 1] == ESCAPE
}

fn is_double_escaped(template: &str, at: usize) -> bool {
    at >= 2 && template.as_bytes()[at - 2] == ESCAPE
}

fn render(out: &mut String, arg: &Arg, ancestors: &mut Vec<*const RefCell<Vec<Arg>>>) {
    match arg {
        Arg::Null => out.push_str("null"),
        Arg::Value(value) => append_display(out, value.as_ref()),
        Arg::Primitives(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{}", item);
            }
            out.push(']');
        }
        Arg::Array(array) => render_array(out, array, ancestors),
    }
}

fn render_array(out: &mut String, array: &ArgArray, ancestors: &mut Vec<*const RefCell<Vec<Arg>>>) {
    let id = array.identity();
    if ancestors.contains(&id) {
        out.push_str(CYCLE_MARKER);
        return;
    }
    let Ok(items) = array.0.try_borrow() else {
        out.push_str(FAILED_RENDERING);
        return;
    };

    ancestors.push(id);
    out.push('[');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        render(out, item, ancestors);
    }
    out.push(']');
    // siblings may legitimately repeat this array
    ancestors.pop();
}

fn append_display(out: &mut String, value: &dyn fmt::Display) {
    let mut rendered = String::new();
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| write!(rendered, "{}", value)));
    match outcome {
        Ok(Ok(())) => out.push_str(&rendered),
        _ => out.push_str(FAILED_RENDERING),
    }
}

/// Build an `&[Arg]` slice from heterogeneous values.
#[macro_export]
macro_rules! args {
    () => {
        &[] as &[$crate::message::Arg]
    };
    ($($value:expr),+ $(,)?) => {
        &[$($crate::message::Arg::from($value)),+]
    };
}

macro_rules! display_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Arg {
                fn from(value: $ty) -> Self {
                    Self::display(value)
                }
            }
        )*
    };
}

display_from!(String, bool, char, i32, i64, u32, u64, usize, f32, f64);

macro_rules! primitives_from {
    ($($ty:ty => $variant:ident as $target:ty),*) => {
        $(
            impl From<Vec<$ty>> for Arg {
                fn from(values: Vec<$ty>) -> Self {
                    Self::Primitives(
                        values.into_iter().map(|v| Primitive::$variant(<$target>::from(v))).collect(),
                    )
                }
            }

            impl From<&[$ty]> for Arg {
                fn from(values: &[$ty]) -> Self {
                    Self::Primitives(
                        values.iter().map(|&v| Primitive::$variant(<$target>::from(v))).collect(),
                    )
                }
            }
        )*
    };
}

primitives_from!(
    bool => Bool as bool,
    char => Char as char,
    u8 => UInt as u64,
    u32 => UInt as u64,
    u64 => UInt as u64,
    i32 => Int as i64,
    i64 => Int as i64,
    f32 => Float as f64,
    f64 => Float as f64
);

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Self::display(value.to_string())
    }
}

impl From<&String> for Arg {
    fn from(value: &String) -> Self {
        Self::display(value.clone())
    }
}

impl From<&Path> for Arg {
    fn from(value: &Path) -> Self {
        Self::display(value.display().to_string())
    }
}

impl From<&eclint_fs::NormalizedPath> for Arg {
    fn from(value: &eclint_fs::NormalizedPath) -> Self {
        Self::display(value.clone())
    }
}

impl From<eclint_fs::Encoding> for Arg {
    fn from(value: eclint_fs::Encoding) -> Self {
        Self::display(value)
    }
}

impl From<ArgArray> for Arg {
    fn from(value: ArgArray) -> Self {
        Self::Array(value)
    }
}

impl From<Vec<Arg>> for Arg {
    fn from(items: Vec<Arg>) -> Self {
        Self::Array(ArgArray::from_vec(items))
    }
}

impl<T: Into<Arg>> From<Option<T>> for Arg {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
