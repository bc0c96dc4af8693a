//! 客户机 CPU 状态
//!
//! Z/P 寄存器与 FFR 位于按 `sve_ir::layout` 排布的 env 字节区，
//! 通用寄存器、SP、NZCV 与浮点舍入模式单独保存。

use sve_core::{ExecError, SveConfig};
use sve_ir::layout::{ENV_SIZE, FFR_PRED_NUM, pred_full_reg_offset, vec_full_reg_offset};
use sve_ir::predflags::predtest_nzcv;
use sve_ir::{Flag, FpStatus, Rounding};

use crate::elem;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nzcv {
    pub n: bool,
    pub z: bool,
    pub c: bool,
    pub v: bool,
}

impl Nzcv {
    /// PSTATE 格式：NZCV 位于 [31:28]
    pub fn bits(self) -> u32 {
        (self.n as u32) << 31 | (self.z as u32) << 30 | (self.c as u32) << 29 | (self.v as u32) << 28
    }
}

#[derive(Debug, Clone)]
pub struct CpuState {
    env: Vec<u8>,
    xregs: [u64; 31],
    sp: u64,
    nzcv: Nzcv,
    rounding: [Rounding; 2],
    vl_bytes: u32,
}

impl CpuState {
    pub fn new(vl_bytes: u32) -> Self {
        Self {
            env: vec![0; ENV_SIZE],
            xregs: [0; 31],
            sp: 0,
            nzcv: Nzcv::default(),
            rounding: [Rounding::TieEven; 2],
            vl_bytes,
        }
    }

    pub fn from_config(config: &SveConfig) -> Self {
        Self::new(config.vl_bytes)
    }

    pub fn vl_bytes(&self) -> u32 {
        self.vl_bytes
    }

    pub fn env(&self) -> &[u8] {
        &self.env
    }

    /// 通用寄存器；31 号读为零
    pub fn xreg(&self, reg: u8) -> u64 {
        self.xregs.get(reg as usize).copied().unwrap_or(0)
    }

    /// 写通用寄存器；写 31 号被丢弃
    pub fn set_xreg(&mut self, reg: u8, val: u64) {
        if let Some(r) = self.xregs.get_mut(reg as usize) {
            *r = val;
        }
    }

    pub fn sp(&self) -> u64 {
        self.sp
    }

    pub fn set_sp(&mut self, val: u64) {
        self.sp = val;
    }

    pub fn nzcv(&self) -> Nzcv {
        self.nzcv
    }

    pub fn set_nzcv(&mut self, nzcv: Nzcv) {
        self.nzcv = nzcv;
    }

    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::N => self.nzcv.n,
            Flag::Z => self.nzcv.z,
            Flag::C => self.nzcv.c,
            Flag::V => self.nzcv.v,
        }
    }

    pub fn set_flag(&mut self, flag: Flag, val: bool) {
        match flag {
            Flag::N => self.nzcv.n = val,
            Flag::Z => self.nzcv.z = val,
            Flag::C => self.nzcv.c = val,
            Flag::V => self.nzcv.v = val,
        }
    }

    /// 按 PredTest 结果字设置 NZCV
    pub fn set_pred_flags(&mut self, flags: u32) {
        let (n, z, c, v) = predtest_nzcv(flags);
        self.nzcv = Nzcv { n, z, c, v };
    }

    pub fn rounding(&self, fpst: FpStatus) -> Rounding {
        self.rounding[fpst_index(fpst)]
    }

    pub fn set_rounding(&mut self, fpst: FpStatus, mode: Rounding) {
        self.rounding[fpst_index(fpst)] = mode;
    }

    /// Z 寄存器的前 VL 字节
    pub fn zreg(&self, reg: u32) -> &[u8] {
        let ofs = vec_full_reg_offset(reg & 31) as usize;
        &self.env[ofs..ofs + self.vl_bytes as usize]
    }

    pub fn zreg_elements(&self, reg: u32, esz: u8) -> Vec<u64> {
        let z = self.zreg(reg);
        (0..z.len() >> esz).map(|i| elem::get(z, i, esz)).collect()
    }

    /// 从元素 0 开始写入，多余元素被忽略，未给出的元素保持不变
    pub fn set_zreg_elements(&mut self, reg: u32, esz: u8, vals: &[u64]) {
        let ofs = vec_full_reg_offset(reg & 31) as usize;
        let z = &mut self.env[ofs..ofs + self.vl_bytes as usize];
        let n = z.len() >> esz;
        for (i, &v) in vals.iter().take(n).enumerate() {
            elem::put(z, i, esz, v);
        }
    }

    /// P 寄存器的前 VL/8 字节；16 号为 FFR
    pub fn preg(&self, reg: u32) -> &[u8] {
        let ofs = pred_full_reg_offset(reg.min(FFR_PRED_NUM)) as usize;
        &self.env[ofs..ofs + self.pred_bytes()]
    }

    pub fn set_preg(&mut self, reg: u32, bytes: &[u8]) {
        let ofs = pred_full_reg_offset(reg.min(FFR_PRED_NUM)) as usize;
        let len = bytes.len().min(self.pred_bytes());
        self.env[ofs..ofs + len].copy_from_slice(&bytes[..len]);
    }

    /// 等同于 PTRUE pd.<T>, ALL
    pub fn set_preg_all(&mut self, reg: u32, esz: u8) {
        let psz = self.pred_bytes();
        let mut p = vec![0u8; psz];
        for i in 0..(psz * 8) >> esz {
            elem::set_pred_bit(&mut p, i << esz, true);
        }
        self.set_preg(reg, &p);
    }

    pub fn ffr(&self) -> &[u8] {
        self.preg(FFR_PRED_NUM)
    }

    fn pred_bytes(&self) -> usize {
        self.vl_bytes as usize / 8
    }

    fn range(&self, ofs: usize, size: usize) -> Result<std::ops::Range<usize>, ExecError> {
        let end = ofs.checked_add(size).filter(|&e| e <= self.env.len());
        end.map(|e| ofs..e).ok_or(ExecError::EnvOutOfRange { offset: ofs, size })
    }

    pub(crate) fn bytes(&self, ofs: usize, size: usize) -> Result<&[u8], ExecError> {
        let r = self.range(ofs, size)?;
        Ok(&self.env[r])
    }

    pub(crate) fn bytes_mut(&mut self, ofs: usize, size: usize) -> Result<&mut [u8], ExecError> {
        let r = self.range(ofs, size)?;
        Ok(&mut self.env[r])
    }

    /// 复制出 env 区间，供写目的前读取源操作数
    pub(crate) fn read(&self, ofs: u32, size: usize) -> Result<Vec<u8>, ExecError> {
        self.bytes(ofs as usize, size).map(<[u8]>::to_vec)
    }

    pub(crate) fn write(&mut self, ofs: u32, data: &[u8]) -> Result<(), ExecError> {
        self.bytes_mut(ofs as usize, data.len())?.copy_from_slice(data);
        Ok(())
    }

    /// 小端读取 `size` 字节（不超过 8）
    pub(crate) fn load(&self, ofs: usize, size: usize) -> Result<u64, ExecError> {
        let src = self.bytes(ofs, size)?;
        let mut b = [0u8; 8];
        b[..size.min(8)].copy_from_slice(&src[..size.min(8)]);
        Ok(u64::from_le_bytes(b))
    }

    pub(crate) fn store(&mut self, ofs: usize, size: usize, val: u64) -> Result<(), ExecError> {
        let n = size.min(8);
        self.bytes_mut(ofs, size)?[..n].copy_from_slice(&val.to_le_bytes()[..n]);
        Ok(())
    }
}

fn fpst_index(fpst: FpStatus) -> usize {
    match fpst {
        FpStatus::A64 => 0,
        FpStatus::A64F16 => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xzr_reads_zero_and_ignores_writes() {
        let mut cpu = CpuState::new(16);
        cpu.set_xreg(31, 7);
        assert_eq!(cpu.xreg(31), 0);
        cpu.set_xreg(3, 9);
        assert_eq!(cpu.xreg(3), 9);
    }

    #[test]
    fn test_zreg_elements() {
        let mut cpu = CpuState::new(16);
        cpu.set_zreg_elements(1, 2, &[1, 2, 3, 4, 5]);
        assert_eq!(cpu.zreg_elements(1, 2), vec![1, 2, 3, 4]);
        assert_eq!(cpu.zreg_elements(1, 3), vec![0x2_0000_0001, 0x4_0000_0003]);
    }

    #[test]
    fn test_ptrue_all() {
        let mut cpu = CpuState::new(32);
        cpu.set_preg_all(2, 2);
        assert_eq!(cpu.preg(2), &[0x11, 0x11, 0x11, 0x11]);
    }

    #[test]
    fn test_pred_flags() {
        let mut cpu = CpuState::new(16);
        cpu.set_pred_flags(sve_ir::predflags::PREDTEST_INIT);
        assert_eq!(cpu.nzcv(), Nzcv { n: false, z: true, c: true, v: false });
        assert_eq!(cpu.nzcv().bits(), 0x6000_0000);
    }

    #[test]
    fn test_env_range_checked() {
        let cpu = CpuState::new(16);
        assert!(cpu.load(ENV_SIZE - 4, 8).is_err());
        assert!(cpu.load(ENV_SIZE - 8, 8).is_ok());
    }
}
