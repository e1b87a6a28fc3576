//! Built-in function signatures by language version.

use std::collections::BTreeMap;

use semver::Version;
use tfschema_core::{FunctionParameter, FunctionSignature, Type};

use crate::table::{TableEntry, VersionedTable};

/// Function name to signature.
pub type FunctionTable = BTreeMap<String, FunctionSignature>;

static ENTRIES: [TableEntry<FunctionTable>; 6] = [
    TableEntry::base(Version::new(0, 12, 0), base_0_12),
    TableEntry::patch(Version::new(0, 14, 0), patch_0_14),
    TableEntry::patch(Version::new(0, 15, 0), patch_0_15),
    TableEntry::patch(Version::new(1, 3, 0), patch_1_3),
    TableEntry::patch(Version::new(1, 5, 0), patch_1_5),
    TableEntry::patch(Version::new(1, 9, 0), patch_1_9),
];

/// Built-in functions by language version.
pub static FUNCTIONS: VersionedTable<FunctionTable> = VersionedTable::new("functions", &ENTRIES);

fn p(name: &str, ty: Type) -> FunctionParameter {
    FunctionParameter::new(name, ty)
}

fn add(table: &mut FunctionTable, name: &str, signature: FunctionSignature) {
    table.insert(name.to_string(), signature);
}

fn base_0_12() -> FunctionTable {
    let any = Type::Dynamic;
    let strings = Type::list(Type::String);
    let mut t = FunctionTable::new();

    add(&mut t, "abs", FunctionSignature::new("Returns the absolute value of the given number", vec![p("num", Type::Number)], Type::Number));
    add(&mut t, "ceil", FunctionSignature::new("Returns the closest whole number greater than or equal to the given value", vec![p("num", Type::Number)], Type::Number));
    add(&mut t, "floor", FunctionSignature::new("Returns the closest whole number less than or equal to the given value", vec![p("num", Type::Number)], Type::Number));
    add(&mut t, "max", FunctionSignature::new("Takes one or more numbers and returns the greatest number", vec![], Type::Number).variadic(p("numbers", Type::Number)));
    add(&mut t, "min", FunctionSignature::new("Takes one or more numbers and returns the smallest number", vec![], Type::Number).variadic(p("numbers", Type::Number)));
    add(&mut t, "format", FunctionSignature::new("Produces a string by formatting a number of other values according to a specification string", vec![p("format", Type::String)], Type::String).variadic(p("args", any.clone())));
    add(&mut t, "join", FunctionSignature::new("Produces a string by concatenating all of the elements of the given lists with the given delimiter", vec![p("separator", Type::String)], Type::String).variadic(p("lists", strings.clone())));
    add(&mut t, "split", FunctionSignature::new("Produces a list by dividing a given string at all occurrences of a given separator", vec![p("separator", Type::String), p("str", Type::String)], strings.clone()));
    add(&mut t, "lower", FunctionSignature::new("Converts all cased letters in the given string to lowercase", vec![p("str", Type::String)], Type::String));
    add(&mut t, "upper", FunctionSignature::new("Converts all cased letters in the given string to uppercase", vec![p("str", Type::String)], Type::String));
    add(&mut t, "replace", FunctionSignature::new("Searches a given string for another given substring, and replaces each occurrence with a given replacement string", vec![p("str", Type::String), p("substr", Type::String), p("replace", Type::String)], Type::String));
    add(&mut t, "substr", FunctionSignature::new("Extracts a substring from a given string by offset and maximum length", vec![p("str", Type::String), p("offset", Type::Number), p("length", Type::Number)], Type::String));
    add(&mut t, "length", FunctionSignature::new("Determines the length of a given list, map, or string", vec![p("value", any.clone())], Type::Number));
    add(&mut t, "concat", FunctionSignature::new("Takes two or more lists and combines them into a single list", vec![], any.clone()).variadic(p("seqs", any.clone())));
    add(&mut t, "merge", FunctionSignature::new("Takes an arbitrary number of maps or objects, and returns a single map or object that contains a merged set of elements from all arguments", vec![], any.clone()).variadic(p("maps", any.clone())));
    add(&mut t, "coalesce", FunctionSignature::new("Takes any number of arguments and returns the first one that isn't null or an empty string", vec![], any.clone()).variadic(p("vals", any.clone())));
    add(&mut t, "lookup", FunctionSignature::new("Retrieves the value of a single element from a map, given its key", vec![p("inputMap", Type::map(any.clone())), p("key", Type::String)], any.clone()).variadic(p("default", any.clone())));
    add(&mut t, "element", FunctionSignature::new("Retrieves a single element from a list", vec![p("list", any.clone()), p("index", Type::Number)], any.clone()));
    add(&mut t, "keys", FunctionSignature::new("Takes a map and returns a list containing the keys from that map", vec![p("inputMap", any.clone())], any.clone()));
    add(&mut t, "values", FunctionSignature::new("Takes a map and returns a list containing the values of the elements in that map", vec![p("mapping", any.clone())], any.clone()));
    add(&mut t, "file", FunctionSignature::new("Reads the contents of a file at the given path and returns them as a string", vec![p("path", Type::String)], Type::String));
    add(&mut t, "jsonencode", FunctionSignature::new("Encodes a given value to a string using JSON syntax", vec![p("val", any.clone())], Type::String));
    add(&mut t, "jsondecode", FunctionSignature::new("Interprets a given string as JSON, returning a representation of the result of decoding that string", vec![p("str", Type::String)], any.clone()));
    add(&mut t, "tostring", FunctionSignature::new("Converts its argument to a string value", vec![p("v", any.clone())], Type::String));
    add(&mut t, "toset", FunctionSignature::new("Converts its argument to a set value", vec![p("v", any.clone())], Type::set(any.clone())));
    add(&mut t, "timestamp", FunctionSignature::new("Returns a UTC timestamp string in RFC 3339 format", vec![], Type::String));
    t
}

fn patch_0_14(t: &mut FunctionTable) {
    let bools = Type::list(Type::Bool);
    add(t, "alltrue", FunctionSignature::new("Returns `true` if all elements in a given collection are `true` or `\"true\"`", vec![p("list", bools.clone())], Type::Bool));
    add(t, "anytrue", FunctionSignature::new("Returns `true` if any element in a given collection is `true` or `\"true\"`", vec![p("list", bools)], Type::Bool));
    add(t, "sum", FunctionSignature::new("Takes a list or set of numbers and returns the sum of those numbers", vec![p("list", Type::Dynamic)], Type::Number));
}

fn patch_0_15(t: &mut FunctionTable) {
    add(t, "one", FunctionSignature::new("Takes a list, set, or tuple value with either zero or one elements", vec![p("list", Type::Dynamic)], Type::Dynamic));
    add(t, "sensitive", FunctionSignature::new("Takes any value and returns a copy of it marked so that Terraform will treat it as sensitive", vec![p("value", Type::Dynamic)], Type::Dynamic));
    add(t, "nonsensitive", FunctionSignature::new("Takes a sensitive value and returns a copy of that value with the sensitive marking removed", vec![p("value", Type::Dynamic)], Type::Dynamic));
}

fn patch_1_3(t: &mut FunctionTable) {
    add(t, "startswith", FunctionSignature::new("Takes two values: a string to check and a prefix string", vec![p("str", Type::String), p("prefix", Type::String)], Type::Bool));
    add(t, "endswith", FunctionSignature::new("Takes two values: a string to check and a suffix string", vec![p("str", Type::String), p("suffix", Type::String)], Type::Bool));
}

fn patch_1_5(t: &mut FunctionTable) {
    add(t, "strcontains", FunctionSignature::new("Checks whether a substring is within another string", vec![p("str", Type::String), p("substr", Type::String)], Type::Bool));
    add(t, "plantimestamp", FunctionSignature::new("Returns a UTC timestamp string in RFC 3339 format, fixed for the duration of a plan", vec![], Type::String));
}

fn patch_1_9(t: &mut FunctionTable) {
    add(t, "templatestring", FunctionSignature::new("Renders a template given in a string value", vec![p("template", Type::String), p("vars", Type::Dynamic)], Type::String));
}
