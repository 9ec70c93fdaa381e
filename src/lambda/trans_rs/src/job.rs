use aws_sdk_mediaconvert as mediaconvert;
use mediaconvert::types::{AacCodingMode, AacSettings, AudioCodec, AudioCodecSettings, AudioDefaultSelection, AudioDescription, AudioSelector, AudioSelectorType, AutomatedAbrSettings, AutomatedEncodingSettings, CmafGroupSettings, ContainerSettings, ContainerType, FileGroupSettings, FrameCaptureSettings, H264FramerateControl, H264QualityTuningLevel, H264RateControlMode, H264SceneChangeDetect, H264Settings, HlsGroupSettings, HlsSettings, Input, JobSettings, M3u8Settings, Output, OutputGroup, OutputGroupSettings, OutputGroupType, OutputSettings, VideoCodec, VideoCodecSettings, VideoDescription};

pub const AUDIO_SELECTOR: &str = "Audio Selector 1";

/// MediaConvert system presets for the progressive downloads, with the
/// suffix appended to each file name.
pub const MP4_RENDITIONS: [(&str, &str); 3] = [
    ("System-Generic_Hd_Mp4_Avc_Aac_16x9_1920x1080p_24Hz_6Mbps", "_avc_1080p"),
    ("System-Generic_Hd_Mp4_Avc_Aac_16x9_1280x720p_24Hz_4.5Mbps", "_avc_720p"),
    ("System-Generic_Sd_Mp4_Avc_Aac_4x3_640x480p_24Hz_1.5Mbps", "_avc_480p"),
];

const SEGMENT_LENGTH: i32 = 10;
const CMAF_FRAGMENT_LENGTH: i32 = 2;

/// Where a job writes: `s3://{output_bucket}/{project}/{job_id}/{group}/`.
#[derive(Debug, Clone, Copy)]
pub struct JobTarget<'a> {
    pub output_bucket: &'a str,
    pub project: &'a str,
    pub job_id: &'a str,
}

impl JobTarget<'_> {
    pub fn destination(&self, group: &str) -> String {
        format!("s3://{}/{}/{}/{}/", self.output_bucket, self.project, self.job_id, group)
    }
}

/// Full job for one uploaded file. Only `input_uri` and `target` vary.
pub fn job_settings(input_uri: &str, target: &JobTarget) -> JobSettings {
    JobSettings::builder()
        .inputs(Input::builder()
            .file_input(input_uri)
            .audio_selectors(AUDIO_SELECTOR, AudioSelector::builder()
                .default_selection(AudioDefaultSelection::Default)
                .selector_type(AudioSelectorType::Track)
                .build())
            .build())
        .output_groups(poster_group(&target.destination("poster")))
        .output_groups(mp4_group(&target.destination("mp4")))
        .output_groups(hls_group(&target.destination("hls")))
        .output_groups(cmaf_group(&target.destination("cmaf")))
        .build()
}

fn poster_group(destination: &str) -> OutputGroup {
    OutputGroup::builder()
        .name("POSTER")
        .outputs(Output::builder()
            .video_description(VideoDescription::builder()
                .codec_settings(VideoCodecSettings::builder()
                    .codec(VideoCodec::FrameCapture)
                    .frame_capture_settings(FrameCaptureSettings::builder()
                        .quality(80)
                        .framerate_numerator(1)
                        .framerate_denominator(3)
                        .max_captures(20)
                        .build())
                    .build())
                .build())
            .container_settings(ContainerSettings::builder()
                .container(ContainerType::Raw)
                .build())
            .build())
        .output_group_settings(file_group_settings(destination))
        .build()
}

fn mp4_group(destination: &str) -> OutputGroup {
    OutputGroup::builder()
        .name("MP4")
        .set_outputs(Some(MP4_RENDITIONS.iter()
            .map(|(preset, name_modifier)| Output::builder()
                .preset(*preset)
                .extension("mp4")
                .name_modifier(*name_modifier)
                .build()
            )
            .collect()
        ))
        .output_group_settings(file_group_settings(destination))
        .build()
}

fn hls_group(destination: &str) -> OutputGroup {
    OutputGroup::builder()
        .name("HLS")
        .outputs(Output::builder()
            .video_description(h264_video())
            .audio_descriptions(aac_audio())
            .output_settings(OutputSettings::builder()
                .hls_settings(HlsSettings::builder().build())
                .build())
            .container_settings(ContainerSettings::builder()
                .container(ContainerType::M3U8)
                .m3u8_settings(M3u8Settings::builder().build())
                .build())
            .build())
        .automated_encoding_settings(abr())
        .output_group_settings(OutputGroupSettings::builder()
            .r#type(OutputGroupType::HlsGroupSettings)
            .hls_group_settings(HlsGroupSettings::builder()
                .destination(destination)
                .min_segment_length(0)
                .segment_length(SEGMENT_LENGTH)
                .build())
            .build())
        .build()
}

// CMAF carries video and audio as separate outputs.
fn cmaf_group(destination: &str) -> OutputGroup {
    OutputGroup::builder()
        .name("CMAF")
        .outputs(Output::builder()
            .video_description(h264_video())
            .container_settings(cmfc())
            .build())
        .outputs(Output::builder()
            .audio_descriptions(aac_audio())
            .container_settings(cmfc())
            .build())
        .automated_encoding_settings(abr())
        .output_group_settings(OutputGroupSettings::builder()
            .r#type(OutputGroupType::CmafGroupSettings)
            .cmaf_group_settings(CmafGroupSettings::builder()
                .destination(destination)
                .segment_length(SEGMENT_LENGTH)
                .fragment_length(CMAF_FRAGMENT_LENGTH)
                .build())
            .build())
        .build()
}

fn file_group_settings(destination: &str) -> OutputGroupSettings {
    OutputGroupSettings::builder()
        .r#type(OutputGroupType::FileGroupSettings)
        .file_group_settings(FileGroupSettings::builder()
            .destination(destination)
            .build())
        .build()
}

fn h264_video() -> VideoDescription {
    VideoDescription::builder()
        .codec_settings(VideoCodecSettings::builder()
            .codec(VideoCodec::H264)
            .h264_settings(H264Settings::builder()
                .rate_control_mode(H264RateControlMode::Qvbr)
                .scene_change_detect(H264SceneChangeDetect::TransitionDetection)
                .quality_tuning_level(H264QualityTuningLevel::MultiPassHq)
                .framerate_control(H264FramerateControl::InitializeFromSource)
                .build())
            .build())
        .build()
}

fn aac_audio() -> AudioDescription {
    AudioDescription::builder()
        .codec_settings(AudioCodecSettings::builder()
            .codec(AudioCodec::Aac)
            .aac_settings(AacSettings::builder()
                .bitrate(96000)
                .coding_mode(AacCodingMode::CodingMode20)
                .sample_rate(48000)
                .build())
            .build())
        .build()
}

fn cmfc() -> ContainerSettings {
    ContainerSettings::builder()
        .container(ContainerType::Cmfc)
        .build()
}

fn abr() -> AutomatedEncodingSettings {
    AutomatedEncodingSettings::builder()
        .abr_settings(AutomatedAbrSettings::builder().build())
        .build()
}
