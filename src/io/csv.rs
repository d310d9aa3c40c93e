use std::io::{self, Write};

use crate::orbital::EphemerisSample;

/// Write ephemeris samples in CSV format.
///
/// Columns: time, pos_x, pos_y, pos_z, vel_x, vel_y, vel_z, radius, speed
pub fn write_ephemeris<W: Write>(writer: &mut W, samples: &[EphemerisSample]) -> io::Result<()> {
    writeln!(writer, "time,pos_x,pos_y,pos_z,vel_x,vel_y,vel_z,radius,speed")?;

    for s in samples {
        writeln!(
            writer,
            "{:.3},{:.6},{:.6},{:.6},{:.9},{:.9},{:.9},{:.6},{:.9}",
            s.time,
            s.pos.x, s.pos.y, s.pos.z,
            s.vel.x, s.vel.y, s.vel.z,
            s.pos.norm(),
            s.speed(),
        )?;
    }

    Ok(())
}

/// Write ephemeris samples to a CSV file at the given path.
pub fn write_ephemeris_file(path: &str, samples: &[EphemerisSample]) -> io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    write_ephemeris(&mut file, samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    #[test]
    fn csv_output_has_header_and_rows() {
        let samples = vec![
            EphemerisSample {
                time: 0.0,
                pos: Vector3::new(7000.0, 0.0, 0.0),
                vel: Vector3::new(0.0, 7.5, 0.0),
            },
            EphemerisSample {
                time: 60.0,
                pos: Vector3::new(6985.0, 449.5, 0.0),
                vel: Vector3::new(-0.48, 7.48, 0.0),
            },
        ];

        let mut buf = Vec::new();
        write_ephemeris(&mut buf, &samples).unwrap();
        let output = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = output.lines().collect();

        assert!(lines[0].starts_with("time,"));
        assert_eq!(lines.len(), 3); // header + 2 data rows
        assert!(lines[1].starts_with("0.000,7000.000000,"));
        assert!(lines[1].ends_with(",7000.000000,7.500000000"));
        assert!(lines[2].starts_with("60.000,"));
    }
}
