//! Recharge (RCH) package
//!
//! Only the attributes the coupler touches are modelled: the recharge
//! option (NRCHOP), the cell-by-cell budget flag (IRCHCB), per-period
//! recharge rates, and per-period layer indices when NRCHOP is 2.

use std::path::Path;

use crate::core::error::{CouplerError, Result};
use crate::core::grid::Grid;
use crate::modflow::reader::{write_int_grid, write_real_grid, PackageReader};

/// NRCHOP value meaning recharge goes to the layer named in IRCH
pub const NRCHOP_LAYER_ARRAY: i32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct RechargePackage {
    pub nrchop: i32,
    pub ipakcb: i32,
    /// One recharge grid per stress period
    pub rech: Vec<Grid<f64>>,
    /// One layer-index grid per stress period; empty unless NRCHOP is 2
    pub irch: Vec<Grid<i32>>,
}

impl RechargePackage {
    pub fn load(path: &Path, model_dir: &Path, nrow: usize, ncol: usize, nper: usize) -> Result<Self> {
        let mut reader = PackageReader::open(path, model_dir)?;
        Self::read(&mut reader, nrow, ncol, nper)
    }

    pub fn read(reader: &mut PackageReader, nrow: usize, ncol: usize, nper: usize) -> Result<Self> {
        if let Some(line) = reader.peek_line() {
            if line.to_ascii_uppercase().starts_with("PARAMETER") {
                return Err(CouplerError::UnsupportedInput(
                    "recharge parameters (PARAMETER NPRCH)".into(),
                ));
            }
        }

        let header = reader.next_line()?;
        let flags = parse_ints(&header, 2).ok_or_else(|| reader.error("expected NRCHOP IRCHCB"))?;
        let (nrchop, ipakcb) = (flags[0], flags[1]);

        let mut rech: Vec<Grid<f64>> = Vec::with_capacity(nper);
        let mut irch: Vec<Grid<i32>> = Vec::new();

        for period in 0..nper {
            let line = reader.next_line()?;
            // INIRCH may be omitted when NRCHOP is not 2
            let flags = parse_ints(&line, 1)
                .ok_or_else(|| reader.error(format!("expected INRECH for stress period {}", period + 1)))?;
            let inrech = flags[0];
            let inirch = flags.get(1).copied().unwrap_or(-1);

            let grid = if inrech >= 0 {
                reader.read_real_grid(nrow, ncol, "RECH")?
            } else {
                rech.last()
                    .cloned()
                    .ok_or_else(|| reader.error("first stress period cannot reuse RECH"))?
            };
            rech.push(grid);

            if nrchop == NRCHOP_LAYER_ARRAY {
                let grid = if inirch >= 0 {
                    reader.read_int_grid(nrow, ncol, "IRCH")?
                } else {
                    irch.last()
                        .cloned()
                        .ok_or_else(|| reader.error("first stress period cannot reuse IRCH"))?
                };
                irch.push(grid);
            }
        }

        Ok(Self {
            nrchop,
            ipakcb,
            rech,
            irch,
        })
    }

    /// A package with new recharge rates and every other attribute kept
    pub fn with_recharge(&self, rech: Vec<Grid<f64>>) -> Self {
        Self {
            nrchop: self.nrchop,
            ipakcb: self.ipakcb,
            rech,
            irch: self.irch.clone(),
        }
    }

    pub fn to_file_string(&self) -> String {
        let mut out = String::new();
        out.push_str("# RCH package written by recharge-coupler\n");
        out.push_str(&format!("{:>10}{:>10}    # NRCHOP IRCHCB\n", self.nrchop, self.ipakcb));

        for (period, grid) in self.rech.iter().enumerate() {
            let layers = self.irch.get(period);
            let inirch = if layers.is_some() { 1 } else { -1 };
            out.push_str(&format!(
                "{:>10}{:>10}    # INRECH INIRCH, stress period {}\n",
                1,
                inirch,
                period + 1
            ));
            write_real_grid(&mut out, grid, "RECH");
            if let Some(layers) = layers {
                write_int_grid(&mut out, layers, "IRCH");
            }
        }
        out
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_file_string())?;
        Ok(())
    }
}

fn parse_ints(line: &str, min: usize) -> Option<Vec<i32>> {
    let values: Vec<i32> = line
        .split_whitespace()
        .map_while(|t| t.parse::<i32>().ok())
        .collect();
    (values.len() >= min).then_some(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(content: &str, nper: usize) -> Result<RechargePackage> {
        let mut reader = PackageReader::from_content(content, Path::new("m.rch"), Path::new("."));
        RechargePackage::read(&mut reader, 2, 2, nper)
    }

    #[test]
    fn test_reuse_previous_period() {
        let pkg = read(
            "# RCH\n 3 50\n 1\nCONSTANT 1.0E-3\n -1\n 1\nINTERNAL 1.0 (FREE) -1\n1 2\n3 4\n",
            3,
        )
        .unwrap();
        assert_eq!((pkg.nrchop, pkg.ipakcb), (3, 50));
        assert_eq!(pkg.rech.len(), 3);
        assert_eq!(pkg.rech[1], pkg.rech[0]);
        assert_eq!(pkg.rech[2].values(), &[1.0, 2.0, 3.0, 4.0]);
        assert!(pkg.irch.is_empty());
    }

    #[test]
    fn test_layer_array_option() {
        let pkg = read(
            "2 0\n1 1\nCONSTANT 0.5\nINTERNAL 1 (FREE) -1\n1 2\n2 1\n1 -1\nCONSTANT 0.25\n",
            2,
        )
        .unwrap();
        assert_eq!(pkg.irch.len(), 2);
        assert_eq!(pkg.irch[0].values(), &[1, 2, 2, 1]);
        assert_eq!(pkg.irch[1], pkg.irch[0]);
        assert_eq!(pkg.rech[1].values(), &[0.25; 4]);
    }

    #[test]
    fn test_parameters_unsupported() {
        let err = read("PARAMETER 1\n3 0\n", 1).unwrap_err();
        assert!(matches!(err, CouplerError::UnsupportedInput(_)));
    }

    #[test]
    fn test_first_period_cannot_reuse() {
        assert!(read("3 0\n-1\n", 1).is_err());
    }

    #[test]
    fn test_rewrite_preserves_attributes() {
        let original = read(
            "2 -1\n1 1\nCONSTANT 0.5\nINTERNAL 1 (FREE) -1\n1 2\n2 1\n",
            1,
        )
        .unwrap();
        let updated = original.with_recharge(vec![Grid::filled(2, 2, 7.25e-4)]);
        let text = updated.to_file_string();

        let reread = read(&text, 1).unwrap();
        assert_eq!(reread.nrchop, original.nrchop);
        assert_eq!(reread.ipakcb, original.ipakcb);
        assert_eq!(reread.irch, original.irch);
        assert_eq!(reread.rech[0].values(), &[7.25e-4; 4]);
    }
}
