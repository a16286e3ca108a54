use crate::codec::{func_slice, optional, CodecResult, Io, Marshal};
use crossgrade_types::{Vec2, Vec3};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Disconnect {
    pub reason: i32,
    pub hide_disconnection_screen: bool,
    pub message: String,
    pub filtered_message: String,
}

impl Marshal for Disconnect {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint32(&mut self.reason)?;
        io.bool(&mut self.hide_disconnection_screen)?;
        if !self.hide_disconnection_screen {
            io.string(&mut self.message)?;
            io.string(&mut self.filtered_message)?;
        }
        Ok(())
    }
}

pub const TEXT_TYPE_RAW: u8 = 0;
pub const TEXT_TYPE_CHAT: u8 = 1;
pub const TEXT_TYPE_TRANSLATION: u8 = 2;
pub const TEXT_TYPE_POPUP: u8 = 3;
pub const TEXT_TYPE_JUKEBOX_POPUP: u8 = 4;
pub const TEXT_TYPE_TIP: u8 = 5;
pub const TEXT_TYPE_SYSTEM: u8 = 6;
pub const TEXT_TYPE_WHISPER: u8 = 7;
pub const TEXT_TYPE_ANNOUNCEMENT: u8 = 8;
pub const TEXT_TYPE_OBJECT_WHISPER: u8 = 9;
pub const TEXT_TYPE_OBJECT: u8 = 10;
pub const TEXT_TYPE_OBJECT_ANNOUNCEMENT: u8 = 11;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Text {
    pub text_type: u8,
    pub needs_translation: bool,
    pub source_name: String,
    pub message: String,
    pub parameters: Vec<String>,
    pub xuid: String,
    pub platform_chat_id: String,
    pub filtered_message: String,
}

impl Text {
    /// Codes every field except the trailing filtered message.
    pub fn marshal_base(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.text_type)?;
        io.bool(&mut self.needs_translation)?;
        match self.text_type {
            TEXT_TYPE_CHAT | TEXT_TYPE_WHISPER | TEXT_TYPE_ANNOUNCEMENT => {
                io.string(&mut self.source_name)?;
                io.string(&mut self.message)?;
            }
            TEXT_TYPE_RAW
            | TEXT_TYPE_TIP
            | TEXT_TYPE_SYSTEM
            | TEXT_TYPE_OBJECT_WHISPER
            | TEXT_TYPE_OBJECT
            | TEXT_TYPE_OBJECT_ANNOUNCEMENT => io.string(&mut self.message)?,
            TEXT_TYPE_TRANSLATION | TEXT_TYPE_POPUP | TEXT_TYPE_JUKEBOX_POPUP => {
                io.string(&mut self.message)?;
                func_slice(io, &mut self.parameters, |io, p| io.string(p))?;
            }
            other => return Err(io.unknown_enum_option(other as i64, "text type")),
        }
        io.string(&mut self.xuid)?;
        io.string(&mut self.platform_chat_id)
    }
}

impl Marshal for Text {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        self.marshal_base(io)?;
        io.string(&mut self.filtered_message)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetTitle {
    pub action_type: i32,
    pub text: String,
    pub fade_in_duration: i32,
    pub remain_duration: i32,
    pub fade_out_duration: i32,
    pub xuid: String,
    pub platform_online_id: String,
    pub filtered_message: String,
}

impl SetTitle {
    pub fn marshal_base(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint32(&mut self.action_type)?;
        io.string(&mut self.text)?;
        io.varint32(&mut self.fade_in_duration)?;
        io.varint32(&mut self.remain_duration)?;
        io.varint32(&mut self.fade_out_duration)?;
        io.string(&mut self.xuid)?;
        io.string(&mut self.platform_online_id)
    }
}

impl Marshal for SetTitle {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        self.marshal_base(io)?;
        io.string(&mut self.filtered_message)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StopSound {
    pub sound_name: String,
    pub stop_all: bool,
    pub stop_music_legacy: bool,
}

impl Marshal for StopSound {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.string(&mut self.sound_name)?;
        io.bool(&mut self.stop_all)?;
        io.bool(&mut self.stop_music_legacy)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraEase {
    pub ease_type: u8,
    pub duration: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraInstructionSet {
    pub preset: u32,
    pub ease: Option<CameraEase>,
    pub position: Option<Vec3>,
    pub rotation: Option<Vec2>,
    pub facing: Option<Vec3>,
    pub default: Option<bool>,
}

impl Marshal for CameraInstructionSet {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u32(&mut self.preset)?;
        optional(io, &mut self.ease, |io, e| {
            io.u8(&mut e.ease_type)?;
            io.f32(&mut e.duration)
        })?;
        optional(io, &mut self.position, |io, p| io.vec3(p))?;
        optional(io, &mut self.rotation, |io, r| io.vec2(r))?;
        optional(io, &mut self.facing, |io, f| io.vec3(f))?;
        optional(io, &mut self.default, |io, d| io.bool(d))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraFadeTime {
    pub fade_in: f32,
    pub wait: f32,
    pub fade_out: f32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraInstructionFade {
    pub time: Option<CameraFadeTime>,
    pub colour: Option<Vec3>,
}

impl Marshal for CameraInstructionFade {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        optional(io, &mut self.time, |io, t| {
            io.f32(&mut t.fade_in)?;
            io.f32(&mut t.wait)?;
            io.f32(&mut t.fade_out)
        })?;
        optional(io, &mut self.colour, |io, c| io.vec3(c))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraInstructionTarget {
    pub center_offset: Option<Vec3>,
    pub entity_unique_id: i64,
}

impl Marshal for CameraInstructionTarget {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        optional(io, &mut self.center_offset, |io, c| io.vec3(c))?;
        io.i64(&mut self.entity_unique_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraInstruction {
    pub set: Option<CameraInstructionSet>,
    pub clear: Option<bool>,
    pub fade: Option<CameraInstructionFade>,
    pub target: Option<CameraInstructionTarget>,
    pub remove_target: Option<bool>,
}

impl CameraInstruction {
    /// Codes the set, clear and fade instructions.
    pub fn marshal_base(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        optional(io, &mut self.set, |io, s| s.marshal(io))?;
        optional(io, &mut self.clear, |io, c| io.bool(c))?;
        optional(io, &mut self.fade, |io, f| f.marshal(io))
    }
}

impl Marshal for CameraInstruction {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        self.marshal_base(io)?;
        optional(io, &mut self.target, |io, t| t.marshal(io))?;
        optional(io, &mut self.remove_target, |io, r| io.bool(r))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SetHud {
    pub elements: Vec<i32>,
    pub visibility: i32,
}

impl Marshal for SetHud {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        func_slice(io, &mut self.elements, |io, e| io.varint32(e))?;
        io.varint32(&mut self.visibility)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientBoundCloseForm;

impl Marshal for ClientBoundCloseForm {
    fn marshal(&mut self, _io: &mut dyn Io) -> CodecResult<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerBoundLoadingScreen {
    pub screen_type: i32,
    pub loading_screen_id: Option<u32>,
}

impl Marshal for ServerBoundLoadingScreen {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.varint32(&mut self.screen_type)?;
        optional(io, &mut self.loading_screen_id, |io, id| io.u32(id))
    }
}

/// Client performance figures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServerBoundDiagnostics {
    pub average_frames_per_second: f32,
    pub average_server_sim_tick_time: f32,
    pub average_client_sim_tick_time: f32,
    pub average_begin_frame_time: f32,
    pub average_input_time: f32,
    pub average_render_time: f32,
    pub average_end_frame_time: f32,
    pub average_remainder_time_percent: f32,
    pub average_unaccounted_time_percent: f32,
}

impl Marshal for ServerBoundDiagnostics {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.f32(&mut self.average_frames_per_second)?;
        io.f32(&mut self.average_server_sim_tick_time)?;
        io.f32(&mut self.average_client_sim_tick_time)?;
        io.f32(&mut self.average_begin_frame_time)?;
        io.f32(&mut self.average_input_time)?;
        io.f32(&mut self.average_render_time)?;
        io.f32(&mut self.average_end_frame_time)?;
        io.f32(&mut self.average_remainder_time_percent)?;
        io.f32(&mut self.average_unaccounted_time_percent)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CodeBuilderSource {
    pub operation: u8,
    pub category: u8,
    pub code_status: u8,
}

impl Marshal for CodeBuilderSource {
    fn marshal(&mut self, io: &mut dyn Io) -> CodecResult<()> {
        io.u8(&mut self.operation)?;
        io.u8(&mut self.category)?;
        io.u8(&mut self.code_status)
    }
}
