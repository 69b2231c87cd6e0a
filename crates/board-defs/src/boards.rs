mod adafruit_feather_s3;
mod atk_dnesp32s3;
