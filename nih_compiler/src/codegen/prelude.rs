//! Library shim placed ahead of every generated program

pub const JS_PRELUDE: &str = "\
//--- NIH system code -------------------
function nih_print(...args) { console.log(...args); }
function nih_printchars(s)  { console.log(s); }
function nih_printlf()      { console.log(''); }

//--- User compiled code-----------------
";

/// Functions the shim defines
pub const SHIM_FUNCTIONS: &[&str] = &["nih_print", "nih_printchars", "nih_printlf"];
