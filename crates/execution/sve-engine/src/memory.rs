//! 客户机内存
//!
//! 解释器只通过 `GuestMemory` 访问客户机地址空间。`FlatMemory` 是一段
//! 从 `base` 开始的连续字节区，越界访问返回 `MemoryError::OutOfBounds`。

use std::ops::Range;
use std::sync::Arc;

use parking_lot::RwLock;
use sve_core::{GuestAddr, MemoryError};

/// 客户机内存访问接口
///
/// 多字节值按小端序组合；大端访问由调用方交换字节。
pub trait GuestMemory {
    fn read(&self, addr: GuestAddr, size: usize) -> Result<u64, MemoryError>;

    fn write(&mut self, addr: GuestAddr, val: u64, size: usize) -> Result<(), MemoryError>;

    fn read_bulk(&self, addr: GuestAddr, buf: &mut [u8]) -> Result<(), MemoryError> {
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.read(addr.wrapping_add(i as u64), 1)? as u8;
        }
        Ok(())
    }

    fn write_bulk(&mut self, addr: GuestAddr, buf: &[u8]) -> Result<(), MemoryError> {
        for (i, &b) in buf.iter().enumerate() {
            self.write(addr.wrapping_add(i as u64), b as u64, 1)?;
        }
        Ok(())
    }

    /// 内存标签检查；默认所有标签匹配
    fn check_tag(&self, _addr: GuestAddr, _size: usize) -> Result<(), MemoryError> {
        Ok(())
    }
}

/// 连续的平坦客户机内存
#[derive(Debug, Clone)]
pub struct FlatMemory {
    base: GuestAddr,
    data: Vec<u8>,
    /// 标签不匹配的地址区间
    tag_faults: Vec<Range<GuestAddr>>,
}

impl FlatMemory {
    pub fn new(base: GuestAddr, size: usize) -> Self {
        Self {
            base,
            data: vec![0; size],
            tag_faults: Vec::new(),
        }
    }

    pub fn base(&self) -> GuestAddr {
        self.base
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// 把 `range` 标记为标签不匹配，此后带 MTE 的访问在其中产生 `TagCheck`
    pub fn poison_tags(&mut self, range: Range<GuestAddr>) {
        self.tag_faults.push(range);
    }

    fn span(&self, addr: GuestAddr, size: usize) -> Result<Range<usize>, MemoryError> {
        let oob = MemoryError::OutOfBounds { addr, size };
        let start = addr.checked_sub(self.base).ok_or(oob.clone())?;
        let start = usize::try_from(start).map_err(|_| oob.clone())?;
        let end = start.checked_add(size).ok_or(oob.clone())?;
        if end > self.data.len() {
            return Err(oob);
        }
        Ok(start..end)
    }
}

impl GuestMemory for FlatMemory {
    fn read(&self, addr: GuestAddr, size: usize) -> Result<u64, MemoryError> {
        if size == 0 || size > 8 {
            return Err(MemoryError::AlignmentViolation { addr, align: size });
        }
        let span = self.span(addr, size)?;
        let mut bytes = [0u8; 8];
        bytes[..size].copy_from_slice(&self.data[span]);
        Ok(u64::from_le_bytes(bytes))
    }

    fn write(&mut self, addr: GuestAddr, val: u64, size: usize) -> Result<(), MemoryError> {
        if size == 0 || size > 8 {
            return Err(MemoryError::AlignmentViolation { addr, align: size });
        }
        let span = self.span(addr, size)?;
        self.data[span].copy_from_slice(&val.to_le_bytes()[..size]);
        Ok(())
    }

    fn read_bulk(&self, addr: GuestAddr, buf: &mut [u8]) -> Result<(), MemoryError> {
        let span = self.span(addr, buf.len())?;
        buf.copy_from_slice(&self.data[span]);
        Ok(())
    }

    fn write_bulk(&mut self, addr: GuestAddr, buf: &[u8]) -> Result<(), MemoryError> {
        let span = self.span(addr, buf.len())?;
        self.data[span].copy_from_slice(buf);
        Ok(())
    }

    fn check_tag(&self, addr: GuestAddr, size: usize) -> Result<(), MemoryError> {
        let end = addr.wrapping_add(size as u64);
        if self.tag_faults.iter().any(|r| addr < r.end && r.start < end) {
            return Err(MemoryError::TagCheck(addr));
        }
        Ok(())
    }
}

/// 多个解释器共享的内存句柄
#[derive(Debug, Clone)]
pub struct SharedMemory {
    inner: Arc<RwLock<FlatMemory>>,
}

impl SharedMemory {
    pub fn new(mem: FlatMemory) -> Self {
        Self {
            inner: Arc::new(RwLock::new(mem)),
        }
    }

    /// 在读锁下检查内存内容
    pub fn with<R>(&self, f: impl FnOnce(&FlatMemory) -> R) -> R {
        f(&self.inner.read())
    }
}

impl GuestMemory for SharedMemory {
    fn read(&self, addr: GuestAddr, size: usize) -> Result<u64, MemoryError> {
        self.inner.read().read(addr, size)
    }

    fn write(&mut self, addr: GuestAddr, val: u64, size: usize) -> Result<(), MemoryError> {
        self.inner.write().write(addr, val, size)
    }

    fn read_bulk(&self, addr: GuestAddr, buf: &mut [u8]) -> Result<(), MemoryError> {
        self.inner.read().read_bulk(addr, buf)
    }

    fn write_bulk(&mut self, addr: GuestAddr, buf: &[u8]) -> Result<(), MemoryError> {
        self.inner.write().write_bulk(addr, buf)
    }

    fn check_tag(&self, addr: GuestAddr, size: usize) -> Result<(), MemoryError> {
        self.inner.read().check_tag(addr, size)
    }
}
