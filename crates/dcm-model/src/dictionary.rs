//! Keyword lookup for common DICOM attributes.
//!
//! Covers the patient, study, series, image and pixel modules that show up
//! in nearly every instance. Attributes outside this table keep their
//! numeric `(GGGG,EEEE)` form in normalized output unless the decoder
//! supplied a keyword itself.

use crate::tag::Tag;

const ENTRIES: &[(Tag, &str)] = &[
    (Tag::new(0x0008, 0x0005), "SpecificCharacterSet"),
    (Tag::new(0x0008, 0x0008), "ImageType"),
    (Tag::new(0x0008, 0x0016), "SOPClassUID"),
    (Tag::new(0x0008, 0x0018), "SOPInstanceUID"),
    (Tag::new(0x0008, 0x0020), "StudyDate"),
    (Tag::new(0x0008, 0x0021), "SeriesDate"),
    (Tag::new(0x0008, 0x0022), "AcquisitionDate"),
    (Tag::new(0x0008, 0x0023), "ContentDate"),
    (Tag::new(0x0008, 0x002A), "AcquisitionDateTime"),
    (Tag::new(0x0008, 0x0030), "StudyTime"),
    (Tag::new(0x0008, 0x0031), "SeriesTime"),
    (Tag::new(0x0008, 0x0032), "AcquisitionTime"),
    (Tag::new(0x0008, 0x0033), "ContentTime"),
    (Tag::new(0x0008, 0x0050), "AccessionNumber"),
    (Tag::new(0x0008, 0x0060), "Modality"),
    (Tag::new(0x0008, 0x0070), "Manufacturer"),
    (Tag::new(0x0008, 0x0080), "InstitutionName"),
    (Tag::new(0x0008, 0x0090), "ReferringPhysicianName"),
    (Tag::new(0x0008, 0x1030), "StudyDescription"),
    (Tag::new(0x0008, 0x103E), "SeriesDescription"),
    (Tag::new(0x0008, 0x1115), "ReferencedSeriesSequence"),
    (Tag::new(0x0008, 0x1140), "ReferencedImageSequence"),
    (Tag::new(0x0008, 0x1150), "ReferencedSOPClassUID"),
    (Tag::new(0x0008, 0x1155), "ReferencedSOPInstanceUID"),
    (Tag::new(0x0010, 0x0010), "PatientName"),
    (Tag::new(0x0010, 0x0020), "PatientID"),
    (Tag::new(0x0010, 0x0030), "PatientBirthDate"),
    (Tag::new(0x0010, 0x0040), "PatientSex"),
    (Tag::new(0x0010, 0x1010), "PatientAge"),
    (Tag::new(0x0010, 0x1020), "PatientSize"),
    (Tag::new(0x0010, 0x1030), "PatientWeight"),
    (Tag::new(0x0018, 0x0015), "BodyPartExamined"),
    (Tag::new(0x0018, 0x0050), "SliceThickness"),
    (Tag::new(0x0018, 0x5100), "PatientPosition"),
    (Tag::new(0x0020, 0x000D), "StudyInstanceUID"),
    (Tag::new(0x0020, 0x000E), "SeriesInstanceUID"),
    (Tag::new(0x0020, 0x0010), "StudyID"),
    (Tag::new(0x0020, 0x0011), "SeriesNumber"),
    (Tag::new(0x0020, 0x0013), "InstanceNumber"),
    (Tag::new(0x0020, 0x0032), "ImagePositionPatient"),
    (Tag::new(0x0020, 0x0037), "ImageOrientationPatient"),
    (Tag::new(0x0028, 0x0002), "SamplesPerPixel"),
    (Tag::new(0x0028, 0x0004), "PhotometricInterpretation"),
    (Tag::new(0x0028, 0x0010), "Rows"),
    (Tag::new(0x0028, 0x0011), "Columns"),
    (Tag::new(0x0028, 0x0030), "PixelSpacing"),
    (Tag::new(0x0028, 0x0100), "BitsAllocated"),
    (Tag::new(0x0028, 0x0101), "BitsStored"),
    (Tag::new(0x0028, 0x0102), "HighBit"),
    (Tag::new(0x0028, 0x0103), "PixelRepresentation"),
    (Tag::new(0x0028, 0x1050), "WindowCenter"),
    (Tag::new(0x0028, 0x1051), "WindowWidth"),
    (Tag::new(0x0400, 0x0500), "EncryptedAttributesSequence"),
    (Tag::new(0x6000, 0x3000), "OverlayData"),
    (Tag::new(0x7FE0, 0x0008), "FloatPixelData"),
    (Tag::new(0x7FE0, 0x0009), "DoubleFloatPixelData"),
    (Tag::PIXEL_DATA, "PixelData"),
];

/// Keyword registered for `tag`, if any.
#[must_use]
pub fn keyword_for(tag: Tag) -> Option<&'static str> {
    ENTRIES
        .iter()
        .find(|(known, _)| *known == tag)
        .map(|(_, keyword)| *keyword)
}

/// Tag registered for `keyword`. Keywords are case-sensitive.
#[must_use]
pub fn tag_for(keyword: &str) -> Option<Tag> {
    ENTRIES
        .iter()
        .find(|(_, known)| *known == keyword)
        .map(|(tag, _)| *tag)
}

/// All registered `(tag, keyword)` pairs.
pub fn entries() -> impl Iterator<Item = (Tag, &'static str)> {
    ENTRIES.iter().copied()
}
