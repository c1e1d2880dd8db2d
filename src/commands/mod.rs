pub type CmdResult<T> = hotpot::Result<(T, i32)>;

pub mod create;
pub mod list;
