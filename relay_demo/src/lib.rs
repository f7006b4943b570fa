//! Sample submissions shared by the tests of the different crates.

use std::sync::LazyLock;

use relay_models::contact::ContactSubmission;

pub static SUBMISSION: LazyLock<ContactSubmission> = LazyLock::new(|| ContactSubmission {
    name: "Max Mustermann".try_into().unwrap(),
    email: "max.mustermann@example.de".parse().unwrap(),
    phone: "+49 30 1234567".try_into().unwrap(),
    message: "Hello World!\nI would like to know more about your services."
        .try_into()
        .unwrap(),
});

pub static SUBMISSION_WITHOUT_PHONE: LazyLock<ContactSubmission> =
    LazyLock::new(|| ContactSubmission {
        name: "A".try_into().unwrap(),
        email: "a@b.com".parse().unwrap(),
        phone: Default::default(),
        message: "hi".try_into().unwrap(),
    });

/// Contains every html special character in each free text field.
pub static SUBMISSION_WITH_MARKUP: LazyLock<ContactSubmission> =
    LazyLock::new(|| ContactSubmission {
        name: r#"<b>"Eve" & 'Mallory'</b>"#.try_into().unwrap(),
        email: "o'brien&co@example.com".parse().unwrap(),
        phone: "<i>0</i>".try_into().unwrap(),
        message: "<script>alert('pwned')</script>\n<a href=\"https://example.com\">click</a>"
            .try_into()
            .unwrap(),
    });
