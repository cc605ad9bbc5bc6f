//! Record codec tests.

use half::f16;

use super::*;
use crate::core::Store;
use crate::schema::keys::*;
use crate::store::MemStore;
use crate::util::{LabeledVoxelPoint, NdArray, Shape, VoxelPoint};

/// A store with one empty group at `/g`.
fn fixture() -> MemStore {
    let mut store = MemStore::new();
    let root = store.root();
    store.create_group(root, "g").unwrap();
    store
}

fn write(store: &mut MemStore, tag: &str, record: &dyn Encode) -> Result<()> {
    let id = store.resolve("/g").unwrap();
    Group::new(store, id).unwrap().write(tag, record)
}

fn attrs<'a>(store: &'a MemStore, path: &str) -> &'a Attributes {
    store.attrs(store.resolve(path).unwrap()).unwrap()
}

fn leaf<'a>(store: &'a MemStore, path: &str) -> &'a NdArray {
    store.dataset(store.resolve(path).unwrap()).unwrap()
}

fn children(store: &MemStore, path: &str) -> Vec<String> {
    store.child_names(store.resolve(path).unwrap()).unwrap()
}

#[test]
fn test_scalars() {
    let mut store = fixture();
    write(&mut store, "count", &ScalarRecord::uint8(7).with_stamp(Stamp::new(3, 9))).unwrap();
    write(&mut store, "temp", &ScalarRecord::float16(f16::from_f32(21.5))).unwrap();
    write(&mut store, "ticks", &ScalarRecord::int64(-4)).unwrap();

    let a = attrs(&store, "/g/count");
    assert_eq!(a.get_str(ATTR_TYPE), Some("uint8"));
    assert_eq!(a.get_int(ATTR_STAMP_SEC), Some(3));
    assert_eq!(a.get_int(ATTR_STAMP_NSEC), Some(9));
    assert_eq!(leaf(&store, "/g/count").scalar_value::<u8>(), Some(7));
    assert_eq!(leaf(&store, "/g/temp").scalar_value::<f16>(), Some(f16::from_f32(21.5)));
    assert_eq!(attrs(&store, "/g/ticks").get_str(ATTR_TYPE), Some("int64"));
}

#[test]
fn test_scalar_dtype_is_exact() {
    let mut store = fixture();
    let wrong = ScalarRecord::new(RecordKind::Int32, NdArray::scalar(1i64));
    assert!(matches!(write(&mut store, "x", &wrong), Err(Error::Dtype { .. })));

    let not_scalar = ScalarRecord::new(RecordKind::Int32, NdArray::from_slice(&[1i32, 2]));
    assert!(matches!(write(&mut store, "x", &not_scalar), Err(Error::Shape { .. })));

    let not_a_scalar_kind = ScalarRecord::new(RecordKind::Mono8, NdArray::scalar(1u8));
    assert!(write(&mut store, "x", &not_a_scalar_kind).is_err());
    assert!(children(&store, "/g").is_empty());
}

#[test]
fn test_image_kinds_roundtrip() {
    let cases = [
        (ImageEncoding::Mono8, NdArray::from_vec((2, 3), vec![1u8; 6]).unwrap()),
        (ImageEncoding::Mono16, NdArray::from_vec((2, 3), vec![1000u16; 6]).unwrap()),
        (ImageEncoding::Bgr8, NdArray::from_vec((2, 2, 3), (0..12u8).collect::<Vec<u8>>()).unwrap()),
        (ImageEncoding::Rgb8, NdArray::from_vec((1, 2, 3), vec![9u8; 6]).unwrap()),
        (ImageEncoding::Bgra8, NdArray::from_vec((2, 1, 4), vec![5u8; 8]).unwrap()),
        (ImageEncoding::Rgba8, NdArray::from_vec((1, 1, 4), vec![0u8, 1, 2, 3]).unwrap()),
        (ImageEncoding::Depth, NdArray::from_vec((2, 2), vec![0.5f32, 1.0, 1.5, f32::NAN]).unwrap()),
    ];

    let mut store = fixture();
    for (encoding, data) in &cases {
        let tag = encoding.kind().name();
        write(&mut store, tag, &Image::new(*encoding, data.clone(), "cam")).unwrap();

        let stored = leaf(&store, &format!("/g/{}", tag));
        assert_eq!(stored.shape(), data.shape());
        assert_eq!(stored.data().to_le_bytes(), data.data().to_le_bytes());

        let a = attrs(&store, &format!("/g/{}", tag));
        assert_eq!(a.get_str(ATTR_TYPE), Some(tag));
        assert_eq!(a.get_str(ATTR_FRAME_ID), Some("cam"));
    }
    assert_eq!(children(&store, "/g").len(), cases.len());
}

#[test]
fn test_image_rejects_before_writing() {
    let mut store = fixture();

    let rgb_as_mono = Image::new(ImageEncoding::Mono8, NdArray::from_vec((2, 2, 3), vec![0u8; 12]).unwrap(), "cam");
    let err = write(&mut store, "a", &rgb_as_mono).unwrap_err();
    assert!(matches!(err, Error::Shape { kind: "mono8", .. }));

    let float_mono = Image::new(ImageEncoding::Mono8, NdArray::from_vec((2, 2), vec![0f32; 4]).unwrap(), "cam");
    assert!(matches!(write(&mut store, "b", &float_mono), Err(Error::Dtype { .. })));

    let wrong_channels = Image::new(ImageEncoding::Bgra8, NdArray::from_vec((2, 2, 3), vec![0u8; 12]).unwrap(), "cam");
    assert!(matches!(write(&mut store, "c", &wrong_channels), Err(Error::Shape { .. })));

    let u16_depth = Image::new(ImageEncoding::Depth, NdArray::from_vec((2, 2), vec![0u16; 4]).unwrap(), "cam");
    assert!(matches!(write(&mut store, "d", &u16_depth), Err(Error::Dtype { .. })));

    assert!(children(&store, "/g").is_empty());
}

#[test]
fn test_duplicate_tag() {
    let mut store = fixture();
    let img = Image::new(ImageEncoding::Mono8, NdArray::from_vec((1, 1), vec![0u8]).unwrap(), "cam");
    write(&mut store, "cam", &img).unwrap();
    assert!(matches!(write(&mut store, "cam", &img), Err(Error::DuplicateKey(tag)) if tag == "cam"));
}

#[test]
fn test_disparity() {
    let mut store = fixture();
    let d = DisparityImage::new(NdArray::from_vec((2, 2), vec![1.0f32; 4]).unwrap(), "stereo", 0.12)
        .with_stamp(Stamp::new(1, 2));
    write(&mut store, "disp", &d).unwrap();
    let a = attrs(&store, "/g/disp");
    assert_eq!(a.get_str(ATTR_TYPE), Some("disparity"));
    assert_eq!(a.get_float(ATTR_BASELINE), Some(0.12));
    assert_eq!(a.get_str(ATTR_FRAME_ID), Some("stereo"));

    let bad = DisparityImage::new(NdArray::from_vec((2, 2), vec![1.0f64; 4]).unwrap(), "stereo", 0.12);
    assert!(matches!(write(&mut store, "bad", &bad), Err(Error::Dtype { .. })));
}

#[test]
fn test_point_cloud_and_semantics() {
    let mut store = fixture();
    let points = NdArray::from_vec((4, 3), vec![0.25f32; 12]).unwrap();

    write(&mut store, "lidar", &PointCloud::new(points.clone(), "velodyne")).unwrap();
    assert!(!attrs(&store, "/g/lidar").contains(ATTR_MAP_ID));

    write(&mut store, "map", &PointCloud::new(points, "world").with_map_id("m1")).unwrap();
    assert_eq!(attrs(&store, "/g/map").get_str(ATTR_MAP_ID), Some("m1"));

    let labels = NdArray::from_slice(&[0u8, 1, 2, 3]);
    write(&mut store, "s1", &Semantic1d::new(labels, "cityscapes")).unwrap();
    let a = attrs(&store, "/g/s1");
    assert_eq!(a.get_str(ATTR_LABEL_TAG), Some("cityscapes"));
    assert!(!a.contains(ATTR_FRAME_ID));

    let seg = NdArray::from_vec((2, 2), vec![1u8; 4]).unwrap();
    write(&mut store, "s2", &Semantic2d::new(seg, "cam", "cityscapes")).unwrap();
    let a = attrs(&store, "/g/s2");
    assert_eq!(a.get_str(ATTR_TYPE), Some("semantic2d"));
    assert_eq!(a.get_str(ATTR_FRAME_ID), Some("cam"));

    let flat = PointCloud::new(NdArray::from_vec((4, 2), vec![0f32; 8]).unwrap(), "x");
    assert!(matches!(write(&mut store, "flat", &flat), Err(Error::Shape { .. })));
}

#[test]
fn test_semantic3d_layout() {
    let mut store = fixture();
    let points = NdArray::from_vec((3, 3), vec![1.0f32; 9]).unwrap();
    let labels = NdArray::from_slice(&[4u8, 5, 6]);
    let record = Semantic3d::new(points, labels, "lidar", "classes")
        .with_map_id("m7")
        .with_stamp(Stamp::new(10, 20));
    write(&mut store, "cloud", &record).unwrap();

    let top = attrs(&store, "/g/cloud");
    assert_eq!(top.get_str(ATTR_TYPE), Some("semantic3d"));
    assert_eq!(top.get_str(ATTR_LABEL_TAG), Some("classes"));
    assert_eq!(top.get_str(ATTR_MAP_ID), Some("m7"));
    assert_eq!(children(&store, "/g/cloud"), vec![SUB_POINTS, SUB_SEMANTIC1D]);

    let pts = attrs(&store, "/g/cloud/points");
    assert_eq!(pts.get_str(ATTR_TYPE), Some("points"));
    assert_eq!(pts.get_str(ATTR_FRAME_ID), Some("lidar"));
    assert_eq!(pts.get_str(ATTR_MAP_ID), Some("m7"));
    assert_eq!(pts.get_int(ATTR_STAMP_SEC), Some(10));

    let sem = attrs(&store, "/g/cloud/semantic1d");
    assert_eq!(sem.get_str(ATTR_LABEL_TAG), Some("classes"));
    assert_eq!(sem.get_int(ATTR_STAMP_NSEC), Some(20));
    assert_eq!(leaf(&store, "/g/cloud/semantic1d").as_slice::<u8>(), Some(&[4u8, 5, 6][..]));
}

#[test]
fn test_semantic3d_inconsistent_writes_nothing() {
    let mut store = fixture();
    let points = NdArray::from_vec((3, 3), vec![1.0f32; 9]).unwrap();
    let labels = NdArray::from_slice(&[0u8, 1, 2, 3]);
    let err = write(&mut store, "cloud", &Semantic3d::new(points, labels, "lidar", "classes")).unwrap_err();
    assert!(matches!(err, Error::Consistency { .. }));
    assert!(err.is_validation());

    // Matching lengths but a bad child dtype also fails before the sub-group exists.
    let points = NdArray::from_vec((2, 3), vec![1.0f64; 6]).unwrap();
    let labels = NdArray::from_slice(&[0u8, 1]);
    let err = write(&mut store, "cloud", &Semantic3d::new(points, labels, "lidar", "classes")).unwrap_err();
    assert!(matches!(err, Error::Dtype { kind: "points", .. }));

    assert!(children(&store, "/g").is_empty());
}

#[test]
fn test_voxel_grids() {
    let mut store = fixture();
    let geometry = VoxelGeometry {
        size: 0.5,
        min: [-1.0, -2.0, -3.0],
        max: [1.0, 2.0, 3.0],
        center: [0.0, 0.0, 0.0],
        origin: [2, 4, 6],
    };
    let cells = vec![vec![VoxelPoint::new(0.1, 0.2, 0.3)], vec![], vec![], vec![]];
    let grid = NdArray::point_grid(Shape::d3(1, 2, 2), cells).unwrap();
    write(&mut store, "vox", &VoxelGrid::new(VoxelKind::Points, grid.clone(), "map", geometry)).unwrap();

    let a = attrs(&store, "/g/vox");
    assert_eq!(a.get_str(ATTR_TYPE), Some("voxel-points"));
    assert_eq!(a.get_float(ATTR_VOXEL_SIZE), Some(0.5));
    assert_eq!(a.get(ATTR_VOXEL_MIN).and_then(|v| v.as_float_array()), Some(&[-1.0, -2.0, -3.0][..]));
    assert_eq!(a.get(ATTR_VOXEL_ORIGIN).and_then(|v| v.as_int_array()), Some(&[2i64, 4, 6][..]));
    assert!(!a.contains(ATTR_LABEL_TAG));
    assert!(!a.contains(ATTR_MAP_ID));

    let labeled = NdArray::labeled_point_grid(Shape::d1(1), vec![vec![LabeledVoxelPoint::new(0.0, 0.0, 0.0, 3)]]).unwrap();
    let record = VoxelGrid::new(VoxelKind::Semantic3d, labeled, "map", geometry)
        .with_label_tag("classes")
        .with_map_id("m1");
    write(&mut store, "svox", &record).unwrap();
    let a = attrs(&store, "/g/svox");
    assert_eq!(a.get_str(ATTR_TYPE), Some("voxel-semantic3d"));
    assert_eq!(a.get_str(ATTR_LABEL_TAG), Some("classes"));

    // Only the aggregate element type is checked.
    let mismatch = VoxelGrid::new(VoxelKind::Semantic3d, grid, "map", geometry);
    assert!(matches!(write(&mut store, "bad", &mismatch), Err(Error::Dtype { .. })));
}

#[test]
fn test_pose_layout() {
    let mut store = fixture();
    let pose = Pose::new(glam::DVec3::new(1.0, 2.0, 3.0), glam::DQuat::IDENTITY, "map", "base_link")
        .with_stamp(Stamp::new(42, 7));
    write(&mut store, "odom", &pose).unwrap();

    let top = attrs(&store, "/g/odom");
    assert_eq!(top.get_str(ATTR_TYPE), Some("pose"));
    assert_eq!(top.get_str(ATTR_CHILD_FRAME_ID), Some("base_link"));
    assert_eq!(children(&store, "/g/odom"), vec![SUB_TRANSLATION, SUB_ROTATION]);

    let t = attrs(&store, "/g/odom/translation");
    assert_eq!(t.get_str(ATTR_TYPE), Some("translation"));
    assert_eq!(t.get_str(ATTR_ARRAY), Some(AXES_XYZ));
    assert_eq!(t.get_int(ATTR_STAMP_SEC), Some(42));

    let r = attrs(&store, "/g/odom/rotation");
    assert_eq!(r.get_str(ATTR_TYPE), Some("quaternion"));
    assert_eq!(r.get_str(ATTR_ARRAY), Some(AXES_XYZW));
    assert_eq!(r.get_int(ATTR_STAMP_NSEC), Some(7));
    assert_eq!(leaf(&store, "/g/odom/rotation").as_slice::<f64>(), Some(&[0.0, 0.0, 0.0, 1.0][..]));
}

#[test]
fn test_pose_validates_children_first() {
    let mut store = fixture();
    let bad_rotation = Pose::new([0.0f32, 0.0, 0.0], [0.0f32, 0.0, 1.0], "map", "base");
    assert!(matches!(write(&mut store, "p", &bad_rotation), Err(Error::Shape { kind: "quaternion", .. })));

    let int_translation = Translation::new([1i32, 2, 3]);
    let err = write(&mut store, "t", &int_translation).unwrap_err();
    assert!(matches!(err, Error::Dtype { kind: "translation", .. }));

    assert!(children(&store, "/g").is_empty());
}

#[test]
fn test_intrinsic_layout() {
    let mut store = fixture();
    let k = Intrinsic::new(500.0, 501.0, 320.0, 240.0, 480, 640, "cam").with_stamp(Stamp::new(1, 0));
    write(&mut store, "K", &k).unwrap();

    let top = attrs(&store, "/g/K");
    assert_eq!(top.get_str(ATTR_TYPE), Some("intrinsic"));
    assert_eq!(top.get_str(ATTR_FRAME_ID), Some("cam"));
    assert_eq!(children(&store, "/g/K"), vec![SUB_FX, SUB_FY, SUB_CX, SUB_CY, SUB_HEIGHT, SUB_WIDTH]);
    assert_eq!(leaf(&store, "/g/K/Fx").scalar_value::<f64>(), Some(500.0));
    assert_eq!(leaf(&store, "/g/K/Cy").scalar_value::<f64>(), Some(240.0));
    assert_eq!(leaf(&store, "/g/K/height").scalar_value::<u32>(), Some(480));
    assert_eq!(leaf(&store, "/g/K/width").scalar_value::<u32>(), Some(640));
    assert!(attrs(&store, "/g/K/width").is_empty());
}

#[test]
fn test_color_is_bgr_without_stamp() {
    let mut store = fixture();
    write(&mut store, "c", &Color::new(10, 20, 30)).unwrap();
    assert_eq!(leaf(&store, "/g/c").as_slice::<u8>(), Some(&[30u8, 20, 10][..]));
    let a = attrs(&store, "/g/c");
    assert_eq!(a.get_str(ATTR_TYPE), Some("color"));
    assert_eq!(a.get_str(ATTR_ARRAY), Some("b,g,r"));
    assert!(!a.contains(ATTR_STAMP_SEC));
}

#[test]
fn test_label_entry() {
    let mut store = fixture();
    let id = store.resolve("/g").unwrap();
    {
        let mut dict = Group::new(&mut store, id).unwrap();
        LabelEntry::new(3, "car", [0u8, 0, 142]).write_to(&mut dict).unwrap();
        let err = LabelEntry::new(3, "truck", [0u8, 0, 70]).write_to(&mut dict).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(k) if k == "3"));
    }
    assert_eq!(children(&store, "/g/3"), vec![KEY_NAME, SUB_COLOR]);
    assert_eq!(leaf(&store, "/g/3/name").as_str(), Some("car"));
    assert_eq!(leaf(&store, "/g/3/color").as_slice::<u8>(), Some(&[142u8, 0, 0][..]));
}

#[test]
fn test_record_dispatch() {
    let mut store = fixture();
    let records: Vec<(&str, Record)> = vec![
        ("n", ScalarRecord::float32(1.5).into()),
        ("c", Color::new(1, 2, 3).into()),
        ("t", Translation::new(glam::Vec3::X).into()),
        ("k", Intrinsic::new(1.0, 1.0, 0.5, 0.5, 1, 1, "cam").into()),
    ];
    for (tag, record) in &records {
        write(&mut store, tag, record).unwrap();
        let a = attrs(&store, &format!("/g/{}", tag));
        assert_eq!(a.get_str(ATTR_TYPE), Some(record.kind().name()));
    }
}

#[test]
fn test_stamp_from_duration() {
    let s = Stamp::from(std::time::Duration::new(12, 345));
    assert_eq!(s, Stamp::new(12, 345));
    assert!(Stamp::default().is_untimed());
    assert!(!s.is_untimed());

    let far = Stamp::from(std::time::Duration::new(u64::MAX, 7));
    assert_eq!(far, Stamp::new(i64::MAX, 7));
}
