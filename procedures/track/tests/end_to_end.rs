use bevy::prelude::Vec3;
use ply::{PlyHeader, PlyWriter};
use std::io::Cursor;
use track::{
	generate, refresh, ClosedLoop, CurveFamily, SeedPolicy, Track, TrackConfig, TrackError,
};

#[test]
fn test_cubic_track_counts() {
	let waypoints = generate(13, Some(7)).unwrap();
	let closed = ClosedLoop::close(&waypoints, CurveFamily::CubicBezier).unwrap();
	assert_eq!(closed.segment_count(), 5);

	let mesh = refresh(&waypoints, CurveFamily::CubicBezier, 0.1, 0.01, 0.5, 0).unwrap();
	assert_eq!(mesh.sample_count(), 505);
	assert_eq!(mesh.vertex_count(), 1010);
	assert_eq!(mesh.triangle_count(), 1008);
	assert!(mesh.flat_vertices().iter().all(|c| c.is_finite()));
}

#[test]
fn test_ply_header_round_trip() {
	let config = TrackConfig::new(SeedPolicy::Fixed(7));
	let track = Track::new(config).unwrap();
	let mesh = track.mesh();

	let text = PlyWriter::new().with_scale(100.0).to_string(&mesh).unwrap();
	let header = PlyHeader::parse(Cursor::new(text.as_bytes())).unwrap();
	assert_eq!(header.vertex_count, 1010);
	assert_eq!(header.face_count, 1008);

	let body = text.lines().skip_while(|line| *line != "end_header").skip(1).count();
	assert_eq!(body, 1010 + 1008);
}

#[test]
fn test_every_family_builds_from_the_same_loop() {
	let waypoints = generate(13, Some(21)).unwrap();
	let expected_segments = [
		(CurveFamily::QuadraticBezier, 7),
		(CurveFamily::CubicBezier, 5),
		(CurveFamily::CatmullRom, 13),
	];
	for (family, segments) in expected_segments {
		let mesh = refresh(&waypoints, family, 0.1, 0.01, 0.5, 3).unwrap();
		assert_eq!(mesh.sample_count(), segments * 101, "{}", family);
	}
}

#[test]
fn test_every_family_follows_the_loop_without_twisting() {
	let waypoints = generate(13, Some(21)).unwrap();
	for family in CurveFamily::ALL {
		let mesh = refresh(&waypoints, family, 0.1, 0.01, 0.0, 3).unwrap();
		let centres: Vec<Vec3> = mesh
			.vertices
			.chunks(2)
			.map(|rails| (Vec3::from_array(rails[0]) + Vec3::from_array(rails[1])) / 2.0)
			.collect();

		// every segment starts where the previous one ended
		for boundary in (101..centres.len()).step_by(101) {
			let gap = centres[boundary - 1].distance(centres[boundary]);
			assert!(gap < 1e-5, "{} gap {} at sample {}", family, gap, boundary);
		}
		assert!(centres[0].distance(centres[centres.len() - 1]) < 1e-5, "{} is open", family);

		// the closing segment is walked in the same direction as the rest of the loop
		let rail = |pair: usize| {
			Vec3::from_array(mesh.vertices[2 * pair + 1]) - Vec3::from_array(mesh.vertices[2 * pair])
		};
		let last = mesh.sample_count() - 1;
		let (closing, before) = (rail(last), rail(last - 1));
		assert!(closing.dot(before) > 0.0, "{} twists at the seam", family);
	}
}

#[test]
fn test_readers_keep_old_snapshot_across_refresh() {
	let mut track = Track::new(TrackConfig::new(SeedPolicy::Fixed(3))).unwrap();
	let published = track.published();
	let held = published.load();

	track.set_family(CurveFamily::CatmullRom).unwrap();
	assert_eq!(held.family(), CurveFamily::CubicBezier);
	assert_eq!(published.load().family(), CurveFamily::CatmullRom);

	let result = track.set_point_count(2);
	assert!(matches!(result, Err(TrackError::InvalidArgument(_))));
	assert_eq!(published.load().family(), CurveFamily::CatmullRom);
	assert_eq!(published.load().generation, 1);
}
