const FALLBACK_PAGE_SIZE: usize = 4096;

/// Size of a virtual memory page on this system
pub fn page_size() -> usize {
    let result = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if result <= 0 {
        FALLBACK_PAGE_SIZE
    } else {
        result as usize
    }
}
