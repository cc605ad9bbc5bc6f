//! Reserved names and attribute keys of the container layout.

/// Top-level group holding the frame count, written at finalize.
pub const KEY_HEADER: &str = "header";
/// Dataset under `/header` holding the frame count.
pub const KEY_LENGTH: &str = "length";
/// Top-level group holding label dictionaries.
pub const KEY_LABEL: &str = "label";
/// Top-level group holding indexed frames.
pub const KEY_DATA: &str = "data";
/// Name leaf of a label dictionary entry.
pub const KEY_NAME: &str = "name";

/// Top-level names a common group may not use.
pub const RESERVED_NAMES: [&str; 3] = [KEY_HEADER, KEY_DATA, KEY_LABEL];

pub const ATTR_TYPE: &str = "type";
pub const ATTR_STAMP_SEC: &str = "stamp.sec";
pub const ATTR_STAMP_NSEC: &str = "stamp.nsec";
pub const ATTR_FRAME_ID: &str = "frame_id";
pub const ATTR_CHILD_FRAME_ID: &str = "child_frame_id";
pub const ATTR_BASELINE: &str = "base_line";
pub const ATTR_ARRAY: &str = "array";
pub const ATTR_MAP_ID: &str = "map_id";
pub const ATTR_LABEL_TAG: &str = "label_tag";
pub const ATTR_VOXEL_SIZE: &str = "voxel_size";
pub const ATTR_VOXEL_MIN: &str = "voxel_min";
pub const ATTR_VOXEL_MAX: &str = "voxel_max";
pub const ATTR_VOXEL_CENTER: &str = "voxel_center";
pub const ATTR_VOXEL_ORIGIN: &str = "voxel_origin";

// Children of composite records.
pub const SUB_TRANSLATION: &str = "translation";
pub const SUB_ROTATION: &str = "rotation";
pub const SUB_POINTS: &str = "points";
pub const SUB_SEMANTIC1D: &str = "semantic1d";
pub const SUB_FX: &str = "Fx";
pub const SUB_FY: &str = "Fy";
pub const SUB_CX: &str = "Cx";
pub const SUB_CY: &str = "Cy";
pub const SUB_HEIGHT: &str = "height";
pub const SUB_WIDTH: &str = "width";
pub const SUB_COLOR: &str = "color";

/// Axis-order comments stored in the `array` attribute.
pub const AXES_XYZ: &str = "x,y,z";
pub const AXES_XYZW: &str = "x,y,z,w";
pub const AXES_BGR: &str = "b,g,r";

/// True if `name` is one of the reserved top-level names.
pub fn is_reserved(name: &str) -> bool {
    RESERVED_NAMES.contains(&name)
}
