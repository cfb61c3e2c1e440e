//! Tag constants for the attributes this library works with directly,
//! and the fixed tables built on top of them.
use crate::Tag;

macro_rules! attributes {
    ($($(#[$meta:meta])* $name:ident = ($group:literal, $element:literal), $keyword:literal, $vr:literal, $vm:literal;)*) => {
        $(
            $(#[$meta])*
            #[doc = concat!("`", $keyword, "` ", stringify!(($group, $element)), ", VR ", $vr, ", VM ", $vm)]
            pub const $name: Tag = Tag($group, $element);
        )*

        /// Keyword, value representation and value multiplicity
        /// of every attribute declared in this module.
        pub(crate) static KNOWN_ATTRIBUTES: &[(Tag, &str, &str, &str)] = &[
            $(($name, $keyword, $vr, $vm),)*
        ];
    };
}

attributes! {
    SPECIFIC_CHARACTER_SET = (0x0008, 0x0005), "SpecificCharacterSet", "CS", "1-n";
    IMAGE_TYPE = (0x0008, 0x0008), "ImageType", "CS", "2-n";
    INSTANCE_CREATION_DATE = (0x0008, 0x0012), "InstanceCreationDate", "DA", "1";
    SOP_CLASS_UID = (0x0008, 0x0016), "SOPClassUID", "UI", "1";
    SOP_INSTANCE_UID = (0x0008, 0x0018), "SOPInstanceUID", "UI", "1";
    STUDY_DATE = (0x0008, 0x0020), "StudyDate", "DA", "1";
    SERIES_DATE = (0x0008, 0x0021), "SeriesDate", "DA", "1";
    ACQUISITION_DATE = (0x0008, 0x0022), "AcquisitionDate", "DA", "1";
    CONTENT_DATE = (0x0008, 0x0023), "ContentDate", "DA", "1";
    ACQUISITION_DATE_TIME = (0x0008, 0x002A), "AcquisitionDateTime", "DT", "1";
    STUDY_TIME = (0x0008, 0x0030), "StudyTime", "TM", "1";
    SERIES_TIME = (0x0008, 0x0031), "SeriesTime", "TM", "1";
    ACQUISITION_TIME = (0x0008, 0x0032), "AcquisitionTime", "TM", "1";
    CONTENT_TIME = (0x0008, 0x0033), "ContentTime", "TM", "1";
    ACCESSION_NUMBER = (0x0008, 0x0050), "AccessionNumber", "SH", "1";
    MODALITY = (0x0008, 0x0060), "Modality", "CS", "1";
    MODALITIES_IN_STUDY = (0x0008, 0x0061), "ModalitiesInStudy", "CS", "1-n";
    MANUFACTURER = (0x0008, 0x0070), "Manufacturer", "LO", "1";
    INSTITUTION_NAME = (0x0008, 0x0080), "InstitutionName", "LO", "1";
    REFERRING_PHYSICIAN_NAME = (0x0008, 0x0090), "ReferringPhysicianName", "PN", "1";
    STATION_NAME = (0x0008, 0x1010), "StationName", "SH", "1";
    STUDY_DESCRIPTION = (0x0008, 0x1030), "StudyDescription", "LO", "1";
    SERIES_DESCRIPTION = (0x0008, 0x103E), "SeriesDescription", "LO", "1";
    PHYSICIANS_OF_RECORD = (0x0008, 0x1048), "PhysiciansOfRecord", "PN", "1-n";
    NAME_OF_PHYSICIANS_READING_STUDY = (0x0008, 0x1060), "NameOfPhysiciansReadingStudy", "PN", "1-n";
    OPERATORS_NAME = (0x0008, 0x1070), "OperatorsName", "PN", "1-n";
    MANUFACTURER_MODEL_NAME = (0x0008, 0x1090), "ManufacturerModelName", "LO", "1";
    REFERENCED_STUDY_SEQUENCE = (0x0008, 0x1110), "ReferencedStudySequence", "SQ", "1";
    PATIENT_NAME = (0x0010, 0x0010), "PatientName", "PN", "1";
    PATIENT_ID = (0x0010, 0x0020), "PatientID", "LO", "1";
    ISSUER_OF_PATIENT_ID = (0x0010, 0x0021), "IssuerOfPatientID", "LO", "1";
    PATIENT_BIRTH_DATE = (0x0010, 0x0030), "PatientBirthDate", "DA", "1";
    PATIENT_SEX = (0x0010, 0x0040), "PatientSex", "CS", "1";
    OTHER_PATIENT_IDS_SEQUENCE = (0x0010, 0x1002), "OtherPatientIDsSequence", "SQ", "1";
    PATIENT_AGE = (0x0010, 0x1010), "PatientAge", "AS", "1";
    PATIENT_SIZE = (0x0010, 0x1020), "PatientSize", "DS", "1";
    PATIENT_WEIGHT = (0x0010, 0x1030), "PatientWeight", "DS", "1";
    BODY_PART_EXAMINED = (0x0018, 0x0015), "BodyPartExamined", "CS", "1";
    SEQUENCE_NAME = (0x0018, 0x0024), "SequenceName", "SH", "1";
    SLICE_THICKNESS = (0x0018, 0x0050), "SliceThickness", "DS", "1";
    KVP = (0x0018, 0x0060), "KVP", "DS", "1";
    REPETITION_TIME = (0x0018, 0x0080), "RepetitionTime", "DS", "1";
    ECHO_TIME = (0x0018, 0x0081), "EchoTime", "DS", "1";
    MAGNETIC_FIELD_STRENGTH = (0x0018, 0x0087), "MagneticFieldStrength", "DS", "1";
    SPACING_BETWEEN_SLICES = (0x0018, 0x0088), "SpacingBetweenSlices", "DS", "1";
    ECHO_TRAIN_LENGTH = (0x0018, 0x0091), "EchoTrainLength", "IS", "1";
    SOFTWARE_VERSIONS = (0x0018, 0x1020), "SoftwareVersions", "LO", "1-n";
    PROTOCOL_NAME = (0x0018, 0x1030), "ProtocolName", "LO", "1";
    TRIGGER_TIME = (0x0018, 0x1060), "TriggerTime", "DS", "1";
    CONVOLUTION_KERNEL = (0x0018, 0x1210), "ConvolutionKernel", "SH", "1-n";
    PATIENT_POSITION = (0x0018, 0x5100), "PatientPosition", "CS", "1";
    STUDY_INSTANCE_UID = (0x0020, 0x000D), "StudyInstanceUID", "UI", "1";
    SERIES_INSTANCE_UID = (0x0020, 0x000E), "SeriesInstanceUID", "UI", "1";
    STUDY_ID = (0x0020, 0x0010), "StudyID", "SH", "1";
    SERIES_NUMBER = (0x0020, 0x0011), "SeriesNumber", "IS", "1";
    ACQUISITION_NUMBER = (0x0020, 0x0012), "AcquisitionNumber", "IS", "1";
    INSTANCE_NUMBER = (0x0020, 0x0013), "InstanceNumber", "IS", "1";
    PATIENT_ORIENTATION = (0x0020, 0x0020), "PatientOrientation", "CS", "2";
    IMAGE_POSITION_PATIENT = (0x0020, 0x0032), "ImagePositionPatient", "DS", "3";
    IMAGE_ORIENTATION_PATIENT = (0x0020, 0x0037), "ImageOrientationPatient", "DS", "6";
    FRAME_OF_REFERENCE_UID = (0x0020, 0x0052), "FrameOfReferenceUID", "UI", "1";
    LATERALITY = (0x0020, 0x0060), "Laterality", "CS", "1";
    IMAGES_IN_ACQUISITION = (0x0020, 0x1002), "ImagesInAcquisition", "IS", "1";
    SLICE_LOCATION = (0x0020, 0x1041), "SliceLocation", "DS", "1";
    SAMPLES_PER_PIXEL = (0x0028, 0x0002), "SamplesPerPixel", "US", "1";
    PHOTOMETRIC_INTERPRETATION = (0x0028, 0x0004), "PhotometricInterpretation", "CS", "1";
    NUMBER_OF_FRAMES = (0x0028, 0x0008), "NumberOfFrames", "IS", "1";
    ROWS = (0x0028, 0x0010), "Rows", "US", "1";
    COLUMNS = (0x0028, 0x0011), "Columns", "US", "1";
    PIXEL_SPACING = (0x0028, 0x0030), "PixelSpacing", "DS", "2";
    BITS_ALLOCATED = (0x0028, 0x0100), "BitsAllocated", "US", "1";
    BITS_STORED = (0x0028, 0x0101), "BitsStored", "US", "1";
    HIGH_BIT = (0x0028, 0x0102), "HighBit", "US", "1";
    PIXEL_REPRESENTATION = (0x0028, 0x0103), "PixelRepresentation", "US", "1";
    WINDOW_CENTER = (0x0028, 0x1050), "WindowCenter", "DS", "1-n";
    WINDOW_WIDTH = (0x0028, 0x1051), "WindowWidth", "DS", "1-n";
    RESCALE_INTERCEPT = (0x0028, 0x1052), "RescaleIntercept", "DS", "1";
    RESCALE_SLOPE = (0x0028, 0x1053), "RescaleSlope", "DS", "1";
    REASON_FOR_STUDY = (0x0032, 0x1030), "ReasonForStudy", "LO", "1";
    REQUESTING_PHYSICIAN = (0x0032, 0x1032), "RequestingPhysician", "PN", "1";
    REQUESTED_PROCEDURE_DESCRIPTION = (0x0032, 0x1060), "RequestedProcedureDescription", "LO", "1";
    REQUESTED_PROCEDURE_PRIORITY = (0x0032, 0x1070), "RequestedProcedurePriority", "SH", "1";
    STUDY_COMMENTS = (0x0032, 0x4000), "StudyComments", "LT", "1";
    UNIVERSAL_ENTITY_ID = (0x0040, 0x0032), "UniversalEntityID", "UT", "1";
    PIXEL_DATA = (0x7FE0, 0x0010), "PixelData", "OB or OW", "1";
}

/// The semantic names which every model type can resolve
/// without consulting the tag dictionary.
pub static COMMON_ATTRIBUTES: &[(&str, Tag)] = &[
    ("PatientName", PATIENT_NAME),
    ("PatientID", PATIENT_ID),
    ("PatientBirthDate", PATIENT_BIRTH_DATE),
    ("StudyInstanceUID", STUDY_INSTANCE_UID),
    ("SeriesInstanceUID", SERIES_INSTANCE_UID),
    ("SOPInstanceUID", SOP_INSTANCE_UID),
    ("SOPClassUID", SOP_CLASS_UID),
    ("Modality", MODALITY),
    ("StudyDate", STUDY_DATE),
    ("StudyTime", STUDY_TIME),
    ("StudyDescription", STUDY_DESCRIPTION),
    ("SeriesNumber", SERIES_NUMBER),
    ("InstanceNumber", INSTANCE_NUMBER),
];

/// Look up one of the [`COMMON_ATTRIBUTES`] by name.
pub fn common_attribute(name: &str) -> Option<Tag> {
    COMMON_ATTRIBUTES
        .iter()
        .find(|(n, _)| *n == name)
        .map(|(_, tag)| *tag)
}

/// Attributes which describe a series as a whole.
pub static SERIES_LEVEL_TAGS: &[Tag] = &[
    SERIES_INSTANCE_UID,
    SERIES_NUMBER,
    SERIES_DESCRIPTION,
    MODALITY,
    OPERATORS_NAME,
    MANUFACTURER_MODEL_NAME,
    MANUFACTURER,
    BODY_PART_EXAMINED,
    PROTOCOL_NAME,
    SEQUENCE_NAME,
    ECHO_TRAIN_LENGTH,
    SERIES_DATE,
    SERIES_TIME,
    TRIGGER_TIME,
    ECHO_TIME,
    REFERENCED_STUDY_SEQUENCE,
    PATIENT_ORIENTATION,
    PATIENT_POSITION,
];

/// Attributes which describe a study as a whole.
pub static STUDY_LEVEL_TAGS: &[Tag] = &[
    STUDY_INSTANCE_UID,
    STUDY_DATE,
    STUDY_TIME,
    REFERRING_PHYSICIAN_NAME,
    ACCESSION_NUMBER,
    STUDY_DESCRIPTION,
    PATIENT_NAME,
    PATIENT_ID,
    PATIENT_BIRTH_DATE,
    PATIENT_SEX,
    STUDY_ID,
    REQUESTING_PHYSICIAN,
    REQUESTED_PROCEDURE_DESCRIPTION,
    STUDY_COMMENTS,
    PHYSICIANS_OF_RECORD,
    NAME_OF_PHYSICIANS_READING_STUDY,
    REASON_FOR_STUDY,
    REQUESTED_PROCEDURE_PRIORITY,
];
