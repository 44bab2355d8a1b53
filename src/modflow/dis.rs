//! Discretization (DIS) package: grid dimensions and stress periods

use std::path::Path;

use crate::core::error::Result;
use crate::modflow::reader::PackageReader;

/// One stress period of the flow model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressPeriod {
    pub index: usize,
    /// PERLEN as written in the DIS file
    pub length: f64,
}

impl StressPeriod {
    /// Whole days covered by the period; fractional days are truncated
    pub fn duration_days(&self) -> usize {
        if self.length > 0.0 {
            self.length as usize
        } else {
            0
        }
    }
}

#[derive(Debug, Clone)]
pub struct Discretization {
    pub nlay: usize,
    pub nrow: usize,
    pub ncol: usize,
    pub stress_periods: Vec<StressPeriod>,
}

impl Discretization {
    pub fn load(path: &Path, model_dir: &Path) -> Result<Self> {
        let mut reader = PackageReader::open(path, model_dir)?;
        Self::read(&mut reader)
    }

    pub fn read(reader: &mut PackageReader) -> Result<Self> {
        let header = reader.next_line()?;
        let dims = header
            .split_whitespace()
            .take(4)
            .map(|t| t.parse::<usize>())
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| reader.error(format!("invalid dimensions: {}", e)))?;
        if dims.len() < 4 {
            return Err(reader.error("expected NLAY NROW NCOL NPER"));
        }
        let (nlay, nrow, ncol, nper) = (dims[0], dims[1], dims[2], dims[3]);

        let laycbd = reader.read_ints(nlay)?;
        let n_bottoms = nlay + laycbd.iter().filter(|c| **c != 0).count();

        reader.read_real_array(ncol, "DELR")?;
        reader.read_real_array(nrow, "DELC")?;
        reader.read_real_array(nrow * ncol, "TOP")?;
        for _ in 0..n_bottoms {
            reader.read_real_array(nrow * ncol, "BOTM")?;
        }

        let mut stress_periods = Vec::with_capacity(nper);
        for index in 0..nper {
            let line = reader.next_line()?;
            // NSTP, TSMULT and Ss/Tr are not needed for recharge
            let length = line
                .split_whitespace()
                .next()
                .and_then(crate::modflow::reader::parse_fortran_real)
                .ok_or_else(|| {
                    reader.error(format!("invalid PERLEN for stress period {}", index + 1))
                })?;
            stress_periods.push(StressPeriod { index, length });
        }

        Ok(Self {
            nlay,
            nrow,
            ncol,
            stress_periods,
        })
    }

    pub fn nper(&self) -> usize {
        self.stress_periods.len()
    }
}
