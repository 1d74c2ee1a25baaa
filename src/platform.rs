#[cfg(target_family = "windows")]
mod windows;

#[cfg(target_family = "unix")]
mod unix;

#[cfg(target_family = "windows")]
pub use self::windows::page_size;

#[cfg(target_family = "unix")]
pub use self::unix::page_size;
