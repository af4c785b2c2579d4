//! Canned replies keyed by keyword predicates.
//!
//! Each table is evaluated top to bottom and the first matching rule wins.
//! Keywords are plain substrings, so "hi" also matches inside "this".

use serde::Serialize;

/// Subject a reply addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Greeting,
    About,
    Services,
    Counselling,
    Video,
    Website,
    Consulting,
    Pricing,
    BasicPackage,
    AdvancedPackage,
    PremiumPackage,
    Mission,
    Vision,
    Values,
    Contact,
    Achievements,
    Benefits,
    Workshops,
    /// No rule matched.
    General,
}

/// Keyword test over a lower-cased transcript.
#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    /// Any of the substrings occurs.
    Any(&'static [&'static str]),
    /// Every predicate holds.
    All(&'static [Predicate]),
    Not(&'static Predicate),
}

impl Predicate {
    /// Evaluate against text that is already lower-cased.
    pub fn matches(&self, lower: &str) -> bool {
        match self {
            Predicate::Any(needles) => needles.iter().any(|n| lower.contains(n)),
            Predicate::All(preds) => preds.iter().all(|p| p.matches(lower)),
            Predicate::Not(pred) => !pred.matches(lower),
        }
    }
}

/// One entry of a reply table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub topic: Topic,
    pub when: Predicate,
    pub reply: &'static str,
}

/// First rule in `rules` matching `transcript` (case-insensitive).
pub fn first_match<'a>(rules: &'a [Rule], transcript: &str) -> Option<&'a Rule> {
    let lower = transcript.to_lowercase();
    rules.iter().find(|rule| rule.when.matches(&lower))
}

const PACKAGE_WORDS: Predicate = Predicate::Any(&["package", "plan"]);

pub static ENGLISH_RULES: &[Rule] = &[
    Rule {
        topic: Topic::Greeting,
        when: Predicate::Any(&["hello", "hi", "hey"]),
        reply: "Hello! Welcome to Gyan Rich. We are an educational platform that empowers students and institutions through innovative solutions. How can I help you today?",
    },
    Rule {
        topic: Topic::About,
        when: Predicate::Any(&["about", "who are you", "what is gyan rich"]),
        reply: "Gyan Rich is an educational platform that bridges the gap between aspirations and achievements. We began with a vision to make learning meaningful and personal for every student. We provide expert counselling sessions, interactive video lectures, and customized digital platforms for schools. Our mission is to empower institutions to go beyond textbooks, helping students discover their potential and making learning an inspiring journey for all.",
    },
    Rule {
        topic: Topic::Services,
        when: Predicate::All(&[
            Predicate::Any(&["service"]),
            Predicate::Not(&Predicate::Any(&["counselling", "video", "website"])),
        ]),
        reply: "We offer four core services: First, Expert Counselling Sessions with personalized career guidance and emotional wellness support. Second, Pre-Recorded Video Lectures for classes 9 to 12 by subject matter experts. Third, Custom School Websites with responsive design and one year free hosting. And fourth, Extra Consulting Services including curriculum development and staff training. We have counselled over 500 students, delivered 300 plus hours of content, and served more than 10 institutions.",
    },
    Rule {
        topic: Topic::Counselling,
        when: Predicate::Any(&["counselling", "counseling", "career guidance"]),
        reply: "Our Expert Counselling Sessions include personalized career guidance based on interests and strengths, certified experienced counselors, emotional wellness support to reduce stress and anxiety, mindset and confidence building programs, and goal-oriented roadmaps for academic and competitive exam growth. We also provide parent counseling support. We have successfully counselled over 500 students.",
    },
    Rule {
        topic: Topic::Video,
        when: Predicate::Any(&["video", "lecture", "recorded", "class"]),
        reply: "We provide Pre-Recorded Video Lectures for classes 9 to 12 across various subjects. Our features include high quality recorded lectures on demand, specific subject matter experts, Q and A sessions, and study materials included. Students can learn at their own pace with lifetime access to recordings. We have over 300 hours of educational content available.",
    },
    Rule {
        topic: Topic::Website,
        when: Predicate::Any(&["website", "web design", "online presence"]),
        reply: "We create Custom School Websites with professional, responsive design tailored specifically for educational institutions. Our websites include one year free hosting and maintenance, SEO optimization for better online presence, school portfolio showcase, and news and updates sections. We have delivered websites for over 10 institutions. This helps schools achieve a modern professional appearance and enhanced online presence.",
    },
    Rule {
        topic: Topic::Consulting,
        when: Predicate::Any(&["consulting", "training", "curriculum"]),
        reply: "Our Extra Consulting Services provide strategic guidance for educational institutions. This includes curriculum development, technology integration, staff training programs, quality assurance, and performance analytics. These services help institutions improve their performance, adopt modern teaching methodologies, and gain competitive advantage through data-driven decision making.",
    },
    Rule {
        topic: Topic::Pricing,
        when: Predicate::Any(&["pricing", "price", "cost", "package"]),
        reply: "We offer three packages. Basic package at rupees 17,999 for 3 months includes monthly career counselling, workshops on career guidance and AI coding, and an IQ test. Advanced package at rupees 34,999 for 3 months includes all basic features plus an extra IQ test, school function recording, and portfolio building. Premium package at rupees 59,999 for 3 months includes all advanced features plus custom pre-recorded lectures by your campus teachers for classes 9 to 12, custom website building, and priority support. Which package would you like to know more about?",
    },
    // Shadowed by pricing whenever "package" is said; reachable via "plan".
    Rule {
        topic: Topic::BasicPackage,
        when: Predicate::All(&[Predicate::Any(&["basic"]), PACKAGE_WORDS]),
        reply: "Our Basic package costs rupees 17,999 for 3 months and is perfect for small schools getting started. It includes one career counselling session each month, one workshop on career guidance, one IQ aptitude test for enhancing students' knowledge, and one workshop on AI and coding.",
    },
    Rule {
        topic: Topic::AdvancedPackage,
        when: Predicate::All(&[Predicate::Any(&["advanced"]), PACKAGE_WORDS]),
        reply: "Our Advanced package costs rupees 34,999 for 3 months and is ideal for schools aiming for growth. It includes all Basic package features, plus one extra IQ aptitude test, recording of any one school function, and portfolio building for your school.",
    },
    Rule {
        topic: Topic::PremiumPackage,
        when: Predicate::All(&[Predicate::Any(&["premium"]), PACKAGE_WORDS]),
        reply: "Our Premium package costs rupees 59,999 for 3 months and is ideal for schools who want to grow fast. It includes all Advanced features, plus your own campus teachers' pre-recorded lectures for classes 9 to 12 in specific subjects, custom website building to increase trust and brand value, and priority support for academic growth.",
    },
    Rule {
        topic: Topic::Mission,
        when: Predicate::Any(&["mission"]),
        reply: "Our mission is to empower students and institutions through innovative educational solutions and expert guidance, going beyond textbooks to help students discover their potential.",
    },
    Rule {
        topic: Topic::Vision,
        when: Predicate::Any(&["vision"]),
        reply: "Our vision is to be the leading educational platform that bridges the gap between aspirations and achievements, transforming the way students learn and grow.",
    },
    Rule {
        topic: Topic::Values,
        when: Predicate::Any(&["values"]),
        reply: "Our core values are excellence, integrity, innovation, and a commitment to transforming students through education. We focus on making learning meaningful and personal for every student.",
    },
    Rule {
        topic: Topic::Contact,
        when: Predicate::Any(&["contact", "reach", "call", "email"]),
        reply: "You can reach us through our contact form at forms.office.com or by clicking 'Get Started' button on our website. We also have a 'Start Your Journey' option on our homepage. Our team will be happy to assist you with any questions.",
    },
    Rule {
        topic: Topic::Achievements,
        when: Predicate::Any(&["achievement", "experience", "success"]),
        reply: "We have achieved significant milestones: counselled over 500 students, created more than 300 hours of educational content, delivered websites for over 10 institutions, and served more than 10 educational institutions with our consulting services. Over the years, we have helped thousands of students achieve their dreams.",
    },
    Rule {
        topic: Topic::Benefits,
        when: Predicate::Any(&["benefit", "advantage", "why choose"]),
        reply: "Choosing Gyan Rich means getting personalized attention, expert guidance from certified counselors, access to high-quality educational content, modern digital solutions for your institution, and comprehensive support for both students and schools. We focus on emotional wellness, academic excellence, and digital transformation all in one platform.",
    },
    Rule {
        topic: Topic::Workshops,
        when: Predicate::Any(&["workshop", "ai", "coding", "iq test"]),
        reply: "We conduct workshops on career guidance, AI and coding, and provide IQ aptitude tests to enhance students' knowledge. These workshops are included in our packages and are designed to help students build confidence, understand modern technology, and discover their strengths.",
    },
];

/// English reply when no rule matches; `{transcript}` is echoed back.
pub const ENGLISH_FALLBACK: &str = "Thank you for your question about {transcript}. Gyan Rich offers expert counselling, video lectures, custom websites, and consulting services for educational institutions. For detailed information about our services and pricing, please visit our website or contact us through the 'Get Started' button. How else can I help you?";

pub static HINDI_RULES: &[Rule] = &[
    Rule {
        topic: Topic::Greeting,
        when: Predicate::Any(&["hello", "hi", "नमस्ते", "हेलो", "हाय"]),
        reply: "नमस्ते! ज्ञान रिच में आपका स्वागत है। हम एक शैक्षिक मंच हैं जो छात्रों और संस्थानों को नवीन समाधानों के माध्यम से सशक्त बनाता है। मैं आपकी कैसे मदद कर सकता हूं?",
    },
    Rule {
        topic: Topic::About,
        when: Predicate::Any(&["बारे", "कौन", "क्या है"]),
        reply: "ज्ञान रिच एक शैक्षिक मंच है जो आकांक्षाओं और उपलब्धियों के बीच की खाई को पाटता है। हम विशेषज्ञ काउंसलिंग सत्र, इंटरैक्टिव वीडियो लेक्चर और स्कूलों के लिए अनुकूलित डिजिटल प्लेटफॉर्म प्रदान करते हैं। हमारा मिशन संस्थानों को पाठ्यपुस्तकों से परे जाने में सशक्त बनाना है।",
    },
    Rule {
        topic: Topic::Services,
        when: Predicate::Any(&["सेवा", "सर्विस"]),
        reply: "हम चार मुख्य सेवाएं प्रदान करते हैं। पहली, विशेषज्ञ काउंसलिंग सत्र जिसमें व्यक्तिगत करियर मार्गदर्शन और भावनात्मक स्वास्थ्य सहायता शामिल है। दूसरी, कक्षा 9 से 12 के लिए पूर्व-रिकॉर्डेड वीडियो लेक्चर। तीसरी, रिस्पॉन्सिव डिज़ाइन के साथ कस्टम स्कूल वेबसाइट। और चौथी, पाठ्यक्रम विकास और स्टाफ प्रशिक्षण सहित अतिरिक्त परामर्श सेवाएं।",
    },
    Rule {
        topic: Topic::Counselling,
        when: Predicate::Any(&["काउंसलिंग", "परामर्श", "करियर"]),
        reply: "हमारे विशेषज्ञ काउंसलिंग सत्र में रुचियों और शक्तियों के आधार पर व्यक्तिगत करियर मार्गदर्शन, प्रमाणित अनुभवी काउंसलर, तनाव और चिंता को कम करने के लिए भावनात्मक स्वास्थ्य सहायता, मानसिकता और आत्मविश्वास निर्माण कार्यक्रम शामिल हैं। हमने 500 से अधिक छात्रों को सफलतापूर्वक काउंसल किया है।",
    },
    Rule {
        topic: Topic::Video,
        when: Predicate::Any(&["वीडियो", "लेक्चर", "क्लास"]),
        reply: "हम कक्षा 9 से 12 के लिए विभिन्न विषयों में पूर्व-रिकॉर्डेड वीडियो लेक्चर प्रदान करते हैं। हमारी सुविधाओं में मांग पर उच्च गुणवत्ता वाले रिकॉर्डेड लेक्चर, विशिष्ट विषय विशेषज्ञ, प्रश्नोत्तर सत्र और अध्ययन सामग्री शामिल हैं। हमारे पास 300 से अधिक घंटे की शैक्षिक सामग्री उपलब्ध है।",
    },
    Rule {
        topic: Topic::Website,
        when: Predicate::Any(&["वेबसाइट", "वेब"]),
        reply: "हम शैक्षिक संस्थानों के लिए विशेष रूप से तैयार की गई पेशेवर, रिस्पॉन्सिव डिज़ाइन के साथ कस्टम स्कूल वेबसाइट बनाते हैं। हमारी वेबसाइटों में एक वर्ष की मुफ्त होस्टिंग और रखरखाव, बेहतर ऑनलाइन उपस्थिति के लिए SEO अनुकूलन शामिल है। हमने 10 से अधिक संस्थानों के लिए वेबसाइट प्रदान की है।",
    },
    Rule {
        topic: Topic::Pricing,
        when: Predicate::Any(&["कीमत", "मूल्य", "पैकेज", "प्राइस"]),
        reply: "हम तीन पैकेज प्रदान करते हैं। बेसिक पैकेज 3 महीने के लिए रुपये 17,999 में जिसमें मासिक करियर काउंसलिंग, कार्यशालाएं और आईक्यू टेस्ट शामिल हैं। एडवांस्ड पैकेज 3 महीने के लिए रुपये 34,999 में जिसमें सभी बेसिक फीचर्स के साथ पोर्टफोलियो बिल्डिंग शामिल है। प्रीमियम पैकेज 3 महीने के लिए रुपये 59,999 में जिसमें कस्टम लेक्चर, वेबसाइट बिल्डिंग और प्राथमिकता समर्थन शामिल है।",
    },
    Rule {
        topic: Topic::Mission,
        when: Predicate::Any(&["मिशन", "उद्देश्य"]),
        reply: "हमारा मिशन नवीन शैक्षिक समाधानों और विशेषज्ञ मार्गदर्शन के माध्यम से छात्रों और संस्थानों को सशक्त बनाना है। हम छात्रों को उनकी क्षमता खोजने में मदद करना चाहते हैं।",
    },
    Rule {
        topic: Topic::Contact,
        when: Predicate::Any(&["संपर्क", "कैसे", "फोन"]),
        reply: "आप हमारे संपर्क फॉर्म के माध्यम से या हमारी वेबसाइट पर 'Get Started' बटन पर क्लिक करके हमसे संपर्क कर सकते हैं। हमारी टीम आपके किसी भी प्रश्न में आपकी सहायता करने में खुश होगी।",
    },
    Rule {
        topic: Topic::Achievements,
        when: Predicate::Any(&["उपलब्धि", "सफलता"]),
        reply: "हमने महत्वपूर्ण उपलब्धियां हासिल की हैं: 500 से अधिक छात्रों को काउंसल किया, 300 से अधिक घंटे की शैक्षिक सामग्री बनाई, 10 से अधिक संस्थानों के लिए वेबसाइट प्रदान की। वर्षों में, हमने हजारों छात्रों को उनके सपने हासिल करने में मदद की है।",
    },
];

pub const HINDI_FALLBACK: &str = "आपके प्रश्न के लिए धन्यवाद। ज्ञान रिच शैक्षिक संस्थानों के लिए विशेषज्ञ काउंसलिंग, वीडियो लेक्चर, कस्टम वेबसाइट और परामर्श सेवाएं प्रदान करता है। हमारी सेवाओं और मूल्य निर्धारण के बारे में विस्तृत जानकारी के लिए, कृपया हमारी वेबसाइट पर जाएं या 'Get Started' बटन के माध्यम से हमसे संपर्क करें। मैं और कैसे आपकी मदद कर सकता हूं?";
