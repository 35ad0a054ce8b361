/// Level templates and the files that describe them.

pub mod info;
pub mod set;
