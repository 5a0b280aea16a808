/// Error codes returned in the `error` field of Zalo ZNS responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZaloErrorCode {
    Success,
    UnknownError,
    ApplicationInvalid,
    ApplicationNotExisted,
    ApplicationNotActivated,
    AppSecretKeyInvalid,
    ApplicationNotLinkedToOa,
    MethodUnsupported,
    MessageIdInvalid,
    PhoneNumberInvalid,
    TemplateIdInvalid,
    CannotEditTemplate,
    ZaloVersionUnsupported,
    TemplateDataEmpty,
    TemplateDataTypeNotDefined,
    ParameterBreaksMaxLength,
    TemplateDataMissingParameter,
    QrCodeCannotBeGenerated,
    ParameterInvalidFormat,
    ButtonInvalid,
    InvalidButtonContentFormat,
    UserInactive,
    OutOfQuota,
    TextInvalid,
    NoPermissionTemplate,
    ZaloAccountNotExisted,
    AccountCannotReceiveMessage,
    OaNoPermission,
    OaNoPermissionCreateTemplate,
    OaNoPermissionUseResource,
    BodyDataEmpty,
    BodyFormatInvalid,
    RsaMessageDecodeFailed,
    AccessTokenInvalid,
    InvalidAppsecretProof,
    OfficialAccountIdInvalid,
    OutOfQuotaDevMode,
    TestTemplateAdminOnly,
    EncodingKeyNotExisted,
    RsaKeyCannotBeGenerated,
    MaximumCharacterLimitExceeded,
    ZnsTemplateNotApproved,
    ParameterInvalid,
    CannotSendAtNight,
    UserNotRespondedOptIn,
    NoPermissionSendZns,
    OaBlockedDueToViolation,
    ZcaAssociationRequired,
    ZcaChargeFailure,
    AppNoPermissionFeature,
    ExtensionNoPermissionZca,
    UserRefusedZnsType,
    UserNotEligible,
    UserRefusedZns,
    RsaKeyNotExisted,
    RsaKeyAlreadyExisted,
    ZnsDailyQuotaExceeded,
    OaMonthlyPromotionQuotaExceeded,
    OaNoPermissionZnsType,
    TemplateDisabledLowQuality,
    TemplateDailyQuotaExceeded,
    OaExceededMonthlyFollowup,
    ZnsJourneyTokenMissing,
    ZnsJourneyTokenInvalid,
    ZnsJourneyTokenTypeInvalid,
    ZnsJourneyTokenExpired,
    NotE2eeTemplate,
    GetE2eeKeyFailed,
    DataInvalid,
}

use ZaloErrorCode::*;

const TABLE: &[(ZaloErrorCode, i64, &str)] = &[
    (Success, 0, "Sent successfully"),
    (UnknownError, -100, "An unknown error occurred, please try again later"),
    (ApplicationInvalid, -101, "Application is invalid"),
    (ApplicationNotExisted, -102, "Application does not exist"),
    (ApplicationNotActivated, -103, "Application has not been activated"),
    (AppSecretKeyInvalid, -104, "Application secret key is invalid"),
    (ApplicationNotLinkedToOa, -105, "Application is not linked to an Official Account"),
    (MethodUnsupported, -106, "Method is not supported"),
    (MessageIdInvalid, -107, "Message id is invalid"),
    (PhoneNumberInvalid, -108, "Phone number is invalid"),
    (TemplateIdInvalid, -109, "Template id is invalid"),
    (CannotEditTemplate, -1091, "Template cannot be edited"),
    (ZaloVersionUnsupported, -110, "Zalo app version is not supported, the user must update to the latest version"),
    (TemplateDataEmpty, -111, "Template data is empty"),
    (TemplateDataTypeNotDefined, -112, "Template data type is not defined"),
    (ParameterBreaksMaxLength, -1121, "Parameter data exceeds the character limit"),
    (TemplateDataMissingParameter, -1122, "Template data is missing a parameter"),
    (QrCodeCannotBeGenerated, -1123, "QR code cannot be generated"),
    (ParameterInvalidFormat, -1124, "Parameter data has an invalid format"),
    (ButtonInvalid, -113, "Button is invalid"),
    (InvalidButtonContentFormat, -1131, "Button content has an invalid format"),
    (UserInactive, -114, "User did not receive the message: account status, ZNS preferences, an outdated Zalo version or another internal error"),
    (OutOfQuota, -115, "ZNS account balance is insufficient"),
    (TextInvalid, -116, "Text content is invalid"),
    (NoPermissionTemplate, -117, "Official Account or application has no permission to use this template"),
    (ZaloAccountNotExisted, -118, "Zalo account does not exist or is disabled"),
    (AccountCannotReceiveMessage, -119, "Account cannot receive ZNS messages"),
    (OaNoPermission, -120, "Official Account has no permission to use this feature"),
    (OaNoPermissionCreateTemplate, -1201, "Official Account has no permission to create templates"),
    (OaNoPermissionUseResource, -1202, "Official Account has no permission to use this resource"),
    (BodyDataEmpty, -121, "Request body is empty"),
    (BodyFormatInvalid, -122, "Request body has an invalid format"),
    (RsaMessageDecodeFailed, -123, "Could not decode the RSA encrypted message"),
    (AccessTokenInvalid, -124, "Access token is invalid"),
    (InvalidAppsecretProof, -1241, "appsecret_proof is invalid"),
    (OfficialAccountIdInvalid, -125, "Official Account id is invalid"),
    (OutOfQuotaDevMode, -126, "Development mode quota exceeded"),
    (TestTemplateAdminOnly, -127, "Test templates can only be sent to the Official Account admin"),
    (EncodingKeyNotExisted, -128, "Encoding key does not exist"),
    (RsaKeyCannotBeGenerated, -129, "RSA key cannot be generated"),
    (MaximumCharacterLimitExceeded, -130, "Content exceeds the maximum character limit"),
    (ZnsTemplateNotApproved, -131, "ZNS template has not been approved"),
    (ParameterInvalid, -132, "Parameter is invalid"),
    (CannotSendAtNight, -133, "This template type cannot be sent at night"),
    (UserNotRespondedOptIn, -134, "User has not responded to the opt-in request"),
    (NoPermissionSendZns, -135, "Official Account has no permission to send ZNS"),
    (OaBlockedDueToViolation, -1351, "Official Account is blocked for policy violations"),
    (ZcaAssociationRequired, -136, "A ZCA account must be associated"),
    (ZcaChargeFailure, -137, "ZCA charge failed"),
    (AppNoPermissionFeature, -138, "Application has no permission to use this feature"),
    (ExtensionNoPermissionZca, -1381, "Extension has no permission to use ZCA"),
    (UserRefusedZnsType, -139, "User refused this type of ZNS message"),
    (UserNotEligible, -140, "User is not eligible to receive this message"),
    (UserRefusedZns, -141, "User refused to receive ZNS messages"),
    (RsaKeyNotExisted, -142, "RSA key does not exist"),
    (RsaKeyAlreadyExisted, -143, "RSA key already exists"),
    (ZnsDailyQuotaExceeded, -144, "Official Account exceeded its daily ZNS limit"),
    (OaMonthlyPromotionQuotaExceeded, -1441, "Official Account exceeded its monthly promotion quota"),
    (OaNoPermissionZnsType, -145, "Official Account has no permission to send this ZNS type"),
    (TemplateDisabledLowQuality, -146, "Template was disabled for low quality"),
    (TemplateDailyQuotaExceeded, -147, "Template exceeded its daily limit"),
    (OaExceededMonthlyFollowup, -1471, "Official Account exceeded its monthly follow-up quota"),
    (ZnsJourneyTokenMissing, -148, "ZNS journey token is missing"),
    (ZnsJourneyTokenInvalid, -149, "ZNS journey token is invalid"),
    (ZnsJourneyTokenTypeInvalid, -1491, "ZNS journey token type is invalid"),
    (ZnsJourneyTokenExpired, -150, "ZNS journey token has expired"),
    (NotE2eeTemplate, -151, "Template is not an end-to-end encrypted template"),
    (GetE2eeKeyFailed, -152, "Could not get the end-to-end encryption key"),
    (DataInvalid, -153, "Data is invalid"),
];

impl ZaloErrorCode {
    pub fn from_code(code: i64) -> Option<Self> {
        TABLE.iter().find(|(_, c, _)| *c == code).map(|(variant, _, _)| *variant)
    }

    pub fn code(self) -> i64 {
        self.entry().1
    }

    pub fn description(self) -> &'static str {
        self.entry().2
    }

    /// Human readable text for a raw code; "Unknown error" for codes outside the table.
    pub fn message(code: i64) -> &'static str {
        Self::from_code(code)
            .map(Self::description)
            .unwrap_or("Unknown error")
    }

    pub fn is_success(code: i64) -> bool {
        code == Success.code()
    }

    fn entry(self) -> &'static (ZaloErrorCode, i64, &'static str) {
        // every variant has exactly one row
        TABLE
            .iter()
            .find(|(variant, _, _)| *variant == self)
            .unwrap_or(&TABLE[1])
    }
}
