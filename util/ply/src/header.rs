use crate::PlyError;
use std::io::BufRead;

/// Element counts read back from a PLY header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlyHeader {
	pub vertex_count: usize,
	pub face_count: usize,
}

impl PlyHeader {
	/// Reads lines up to and including `end_header`.
	///
	/// Only the `element` lines are interpreted; property declarations are accepted as-is.
	pub fn parse<R: BufRead>(reader: R) -> Result<Self, PlyError> {
		let mut header = PlyHeader::default();
		let mut lines = reader.lines().enumerate();

		let magic = lines.next().map(|(_, line)| line).transpose()?;
		if magic.as_deref().map(str::trim) != Some("ply") {
			return Err(PlyError::MalformedHeader {
				line: 1,
				reason: "missing ply magic".to_string(),
			});
		}

		for (index, line) in lines {
			let line = line?;
			let mut words = line.split_whitespace();
			match words.next() {
				Some("end_header") => return Ok(header),
				Some("element") => {
					let name = words.next();
					let count = words.next().and_then(|count| count.parse::<usize>().ok());
					match (name, count) {
						(Some("vertex"), Some(count)) => header.vertex_count = count,
						(Some("face"), Some(count)) => header.face_count = count,
						(Some(_), Some(_)) => {}
						_ => {
							return Err(PlyError::MalformedHeader {
								line: index + 1,
								reason: format!("bad element declaration: {}", line),
							})
						}
					}
				}
				_ => {}
			}
		}

		Err(PlyError::MalformedHeader {
			line: 0,
			reason: "reached end of input before end_header".to_string(),
		})
	}
}
