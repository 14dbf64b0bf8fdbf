use crate::{PlyError, TriangleMesh};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes meshes as ascii PLY.
///
/// Positions may be multiplied by a uniform `scale` on the way out. Faces are written
/// untouched, so scaling never changes topology.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlyWriter {
	pub scale: f32,
}

impl Default for PlyWriter {
	fn default() -> Self {
		Self { scale: 1.0 }
	}
}

impl PlyWriter {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_scale(mut self, scale: f32) -> Self {
		self.scale = scale;
		self
	}

	fn write_header<W: Write>(
		&self,
		writer: &mut W,
		vertex_count: usize,
		face_count: usize,
	) -> Result<(), PlyError> {
		writeln!(writer, "ply")?;
		writeln!(writer, "format ascii 1.0")?;
		writeln!(writer, "element vertex {}", vertex_count)?;
		writeln!(writer, "property float x")?;
		writeln!(writer, "property float y")?;
		writeln!(writer, "property float z")?;
		writeln!(writer, "element face {}", face_count)?;
		writeln!(writer, "property list uint8 int32 vertex_indices")?;
		writeln!(writer, "end_header")?;
		Ok(())
	}

	/// Writes the mesh to any writer.
	pub fn write<W: Write, M: TriangleMesh + ?Sized>(
		&self,
		mesh: &M,
		writer: &mut W,
	) -> Result<(), PlyError> {
		let positions = mesh.positions();
		let triangles = mesh.triangles();

		self.write_header(writer, positions.len(), triangles.len())?;

		for [x, y, z] in positions {
			writeln!(writer, "{} {} {}", x * self.scale, y * self.scale, z * self.scale)?;
		}

		for [a, b, c] in triangles {
			writeln!(writer, "3 {} {} {}", a, b, c)?;
		}

		writer.flush()?;
		Ok(())
	}

	/// Renders the mesh into an in-memory string.
	pub fn to_string<M: TriangleMesh + ?Sized>(&self, mesh: &M) -> Result<String, PlyError> {
		let mut buffer = Vec::new();
		self.write(mesh, &mut buffer)?;
		// everything written above is ascii
		Ok(String::from_utf8_lossy(&buffer).into_owned())
	}

	/// Creates (or truncates) `path` and writes the mesh into it.
	pub fn write_file<M: TriangleMesh + ?Sized>(
		&self,
		mesh: &M,
		path: impl AsRef<Path>,
	) -> Result<(), PlyError> {
		let path = path.as_ref();
		let start_time = std::time::Instant::now();

		let file = File::create(path)?;
		let mut writer = BufWriter::new(file);
		self.write(mesh, &mut writer)?;

		let duration = start_time.elapsed();
		log::info!(
			"Wrote {} vertices and {} faces to {:?} in {:?}",
			mesh.positions().len(),
			mesh.triangles().len(),
			path,
			duration
		);
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	struct Quad {
		positions: Vec<[f32; 3]>,
		triangles: Vec<[u32; 3]>,
	}

	impl TriangleMesh for Quad {
		fn positions(&self) -> &[[f32; 3]] {
			&self.positions
		}

		fn triangles(&self) -> &[[u32; 3]] {
			&self.triangles
		}
	}

	fn quad() -> Quad {
		Quad {
			positions: vec![
				[0.0, 0.0, 0.0],
				[1.0, 0.0, 0.0],
				[0.0, 1.0, 0.0],
				[1.0, 1.0, 0.5],
			],
			triangles: vec![[0, 1, 2], [1, 3, 2]],
		}
	}

	#[test]
	fn test_header_layout() {
		let text = PlyWriter::new().to_string(&quad()).unwrap();
		let header: Vec<&str> = text.lines().take(9).collect();
		assert_eq!(
			header,
			vec![
				"ply",
				"format ascii 1.0",
				"element vertex 4",
				"property float x",
				"property float y",
				"property float z",
				"element face 2",
				"property list uint8 int32 vertex_indices",
				"end_header",
			]
		);
	}

	#[test]
	fn test_body_lines() {
		let text = PlyWriter::new().to_string(&quad()).unwrap();
		let body: Vec<&str> = text.lines().skip(9).collect();
		assert_eq!(body.len(), 6);
		assert_eq!(body[3], "1 1 0.5");
		assert_eq!(body[4], "3 0 1 2");
		assert_eq!(body[5], "3 1 3 2");
	}

	#[test]
	fn test_scale_only_touches_positions() {
		let text = PlyWriter::new().with_scale(100.0).to_string(&quad()).unwrap();
		let body: Vec<&str> = text.lines().skip(9).collect();
		assert_eq!(body[3], "100 100 50");
		assert_eq!(body[5], "3 1 3 2");
	}
}
