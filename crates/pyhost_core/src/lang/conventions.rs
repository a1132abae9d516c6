//! Well-known identifiers shared by the runtime and its front-end.

/// Name of the implicit absolute root class.
pub const OBJECT_CLASS: &str = "object";

/// Class of native and managed functions.
pub const FUNCTION_CLASS: &str = "function";

/// Class of bound methods.
pub const METHOD_CLASS: &str = "method";

/// Class of module instances.
pub const MODULE_CLASS: &str = "module";

/// Ultimate ancestor of every exception class. Created outside the declarative forest.
pub const BASE_EXCEPTION: &str = "BaseException";

/// Initializer looked up (through the ancestry) when a plain class is instantiated.
pub const INIT_METHOD: &str = "__init__";

/// Attribute holding an exception's payload.
pub const MESSAGE_ATTR: &str = "message";

/// Attribute holding a module's declared name.
pub const NAME_ATTR: &str = "__name__";

/// Declared name of the module launched as the program entry point.
pub const MAIN_MODULE_NAME: &str = "__main__";

/// Default qualifier used in the textual form of exceptions (`qualifier: Class: message`).
pub const DEFAULT_QUALIFIER: &str = "pyhost";
